//! Field value validation for configuration objects
//!
//! Pure checks over single field values. Each returns a human-readable
//! message on failure; the snapshot validator attaches entity and field
//! context and turns them into issues.

use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Maximum length of an object name accepted by the appliance
pub const MAX_NAME_LEN: usize = 79;

/// Maximum length of an interface or zone name
pub const MAX_INTERFACE_LEN: usize = 35;

/// Validates an object name.
///
/// # Errors
///
/// Returns `Err` if the name is empty, longer than [`MAX_NAME_LEN`], or
/// contains control characters.
pub fn validate_object_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("Name too long (max {MAX_NAME_LEN} characters)"));
    }

    if name.chars().any(char::is_control) {
        return Err("Name contains control characters".to_string());
    }

    Ok(())
}

/// Validates a single port number.
///
/// # Errors
///
/// Returns `Err` if port is 0 (reserved).
pub fn validate_port(port: u16) -> Result<u16, String> {
    if port == 0 {
        Err("Port must be between 1 and 65535".to_string())
    } else {
        Ok(port)
    }
}

/// Validates a port range.
///
/// # Errors
///
/// Returns `Err` if:
/// - Either port is 0
/// - Start port is greater than end port
pub fn validate_port_range(start: u16, end: u16) -> Result<(u16, u16), String> {
    validate_port(start)?;
    validate_port(end)?;

    if start > end {
        Err("Start port must be less than or equal to end port".to_string())
    } else {
        Ok((start, end))
    }
}

/// Validates a network interface name.
///
/// Interface and zone names on the appliance:
/// - Max 35 characters
/// - Alphanumeric, dot, dash, underscore only
/// - Cannot be empty, "." or ".."
///
/// # Errors
///
/// Returns `Err` if interface name violates these constraints.
pub fn validate_interface(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Interface name cannot be empty".to_string());
    }

    if name.len() > MAX_INTERFACE_LEN {
        return Err(format!(
            "Interface name too long (max {MAX_INTERFACE_LEN} characters)"
        ));
    }

    if name == "." || name == ".." {
        return Err("Invalid interface name".to_string());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err("Interface name contains invalid characters".to_string());
    }

    Ok(())
}

/// Validates a fully qualified domain name, allowing a leading `*` wildcard label.
///
/// # Errors
///
/// Returns `Err` for empty names, names over 255 bytes, empty labels, or
/// characters outside letters, digits, `-` and `_`.
pub fn validate_fqdn(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Address value cannot be empty".to_string());
    }

    if name.len() > 255 {
        return Err("FQDN too long (max 255 characters)".to_string());
    }

    for (i, label) in name.split('.').enumerate() {
        if label.is_empty() {
            return Err(format!("'{name}' contains an empty label"));
        }
        if label == "*" && i == 0 {
            continue;
        }
        if label.len() > 63 {
            return Err(format!("Label '{label}' too long (max 63 characters)"));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        {
            return Err(format!("'{name}' is not a valid address, range or FQDN"));
        }
    }

    Ok(())
}

/// Validates a network prefix in CIDR form and requires clear host bits.
///
/// # Errors
///
/// Returns `Err` if the text is not an IPv4 CIDR or has host bits set.
pub fn validate_prefix(value: &str) -> Result<Ipv4Network, String> {
    let net: Ipv4Network = value
        .parse()
        .map_err(|e| format!("Invalid prefix '{value}': {e}"))?;

    if net.ip() != net.network() {
        return Err(format!(
            "Prefix '{value}' has host bits set (network is {}/{})",
            net.network(),
            net.prefix()
        ));
    }

    Ok(net)
}

/// Validates a host address.
///
/// # Errors
///
/// Returns `Err` if the text is not an IPv4 address.
pub fn validate_host(value: &str) -> Result<Ipv4Addr, String> {
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid IPv4 address"))
}

/// Validates a host address or an inclusive `start-end` range.
///
/// # Errors
///
/// Returns `Err` if either side is not an IPv4 address or the range is inverted.
pub fn validate_host_or_range(value: &str) -> Result<(), String> {
    match value.split_once('-') {
        Some((start, end)) => {
            let start = validate_host(start)?;
            let end = validate_host(end)?;
            if start > end {
                return Err(format!("Range start {start} is after end {end}"));
            }
            Ok(())
        }
        None => validate_host(value).map(|_| ()),
    }
}

/// Validates an object UUID.
///
/// # Errors
///
/// Returns `Err` if the text does not parse as a UUID.
pub fn validate_uuid(value: &str) -> Result<(), String> {
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|e| format!("Invalid UUID '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_name_valid() {
        assert!(validate_object_name("LAN").is_ok());
        assert!(validate_object_name("Web Servers").is_ok());
        assert!(validate_object_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_validate_object_name_invalid() {
        assert!(validate_object_name("").is_err());
        assert!(validate_object_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_object_name("bad\nname").is_err());
    }

    #[test]
    fn test_validate_port_zero() {
        assert!(validate_port(0).is_err());
    }

    #[test]
    fn test_validate_port_valid() {
        assert_eq!(validate_port(1).unwrap(), 1);
        assert_eq!(validate_port(443).unwrap(), 443);
        assert_eq!(validate_port(65535).unwrap(), 65535);
    }

    #[test]
    fn test_validate_port_range_valid() {
        assert_eq!(validate_port_range(80, 80).unwrap(), (80, 80));
        assert_eq!(validate_port_range(1024, 65535).unwrap(), (1024, 65535));
    }

    #[test]
    fn test_validate_port_range_invalid() {
        assert!(validate_port_range(0, 80).is_err());
        assert!(validate_port_range(443, 80).is_err());
    }

    #[test]
    fn test_validate_interface_valid() {
        assert!(validate_interface("port1").is_ok());
        assert!(validate_interface("wan1").is_ok());
        assert!(validate_interface("internal.10").is_ok());
        assert!(validate_interface("any").is_ok());
    }

    #[test]
    fn test_validate_interface_invalid() {
        assert!(validate_interface("").is_err());
        assert!(validate_interface("..").is_err());
        assert!(validate_interface("port 1").is_err());
        assert!(validate_interface("virtual-wan-link").is_ok());
        assert!(validate_interface(&"x".repeat(MAX_INTERFACE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_fqdn() {
        assert!(validate_fqdn("example.com").is_ok());
        assert!(validate_fqdn("*.example.com").is_ok());
        assert!(validate_fqdn("update_server").is_ok());
        assert!(validate_fqdn("").is_err());
        assert!(validate_fqdn("example..com").is_err());
        assert!(validate_fqdn("exa mple.com").is_err());
        assert!(validate_fqdn("a.*.com").is_err());
    }

    #[test]
    fn test_validate_prefix() {
        assert_eq!(
            validate_prefix("10.0.0.0/8").unwrap(),
            "10.0.0.0/8".parse::<Ipv4Network>().unwrap()
        );
        assert!(validate_prefix("0.0.0.0/0").is_ok());
        assert!(validate_prefix("10.0.0.1/8").is_err());
        assert!(validate_prefix("10.0.0.0/40").is_err());
        assert!(validate_prefix("not-a-prefix").is_err());
    }

    #[test]
    fn test_validate_host_or_range() {
        assert!(validate_host_or_range("203.0.113.10").is_ok());
        assert!(validate_host_or_range("192.168.1.10-192.168.1.20").is_ok());
        assert!(validate_host_or_range("192.168.1.20-192.168.1.10").is_err());
        assert!(validate_host_or_range("192.168.1.0/24").is_err());
        assert!(validate_host_or_range("").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("5b4b7a2e-1c3d-51ea-4f3a-9c2b1d0e8f7a").is_ok());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
