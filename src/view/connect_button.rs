//! Connect Button
//!
//! Header control: a connect prompt, or the connected account.

/// Shorten an account to its first and last four characters
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Label for the header control
pub fn connect_button(address: &str) -> String {
    if address.is_empty() {
        "[ Connect Wallet ]".to_string()
    } else {
        format!("● {}", short_address(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected() {
        assert_eq!(connect_button(""), "[ Connect Wallet ]");
    }

    #[test]
    fn test_connected() {
        let address = "GABCDEFGHIJKLMNOPQRSTUVWXYZ";
        assert_eq!(short_address(address), "GABC...WXYZ");
        assert_eq!(connect_button(address), "● GABC...WXYZ");
    }

    #[test]
    fn test_short_input() {
        assert_eq!(short_address("GABC"), "GABC");
    }
}
