use std::net::IpAddr;

/// IP utility functions for validation and scope detection

/// Check if a string is a valid IPv4 address in dotted-quad form
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<std::net::Ipv4Addr>().is_ok()
}

/// Check if an IP address is private (RFC 1918 for IPv4, RFC 4193 for IPv6)
pub fn is_private_ip(ip: &str) -> Result<bool, String> {
    match ip.trim().parse::<IpAddr>() {
        Ok(IpAddr::V4(ipv4)) => {
            let octets = ipv4.octets();
            Ok(
                // 10.0.0.0/8
                octets[0] == 10 ||
                // 172.16.0.0/12
                (octets[0] == 172 && octets[1] >= 16 && octets[1] <= 31) ||
                // 192.168.0.0/16
                (octets[0] == 192 && octets[1] == 168)
            )
        }
        Ok(IpAddr::V6(ipv6)) => {
            // RFC 4193 Unique Local Addresses (fc00::/7)
            Ok(ipv6.segments()[0] & 0xfe00 == 0xfc00)
        }
        Err(_) => Err(format!("Invalid IP address '{}'", ip)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ips() {
        assert!(is_valid_ipv4("10.0.0.1"));
        assert!(!is_valid_ipv4("300.1.1.1"));
        assert!(!is_valid_ipv4("not-an-ip"));
        assert!(!is_valid_ipv4("::1"));
    }

    #[test]
    fn test_private_ranges() {
        assert_eq!(is_private_ip("10.5.5.5"), Ok(true));
        assert_eq!(is_private_ip("172.20.1.1"), Ok(true));
        assert_eq!(is_private_ip("172.32.1.1"), Ok(false));
        assert_eq!(is_private_ip("192.168.99.99"), Ok(true));
        assert_eq!(is_private_ip("8.8.8.8"), Ok(false));
        assert_eq!(is_private_ip("fd00::1"), Ok(true));
        assert!(is_private_ip("garbage").is_err());
    }
}
