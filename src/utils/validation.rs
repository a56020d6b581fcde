use crate::utils::error::{ContactError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ContactError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Route paths are mounted on the axum router and must be absolute.
pub fn validate_route_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    if !path.starts_with('/') {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Route path must start with '/'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_mailbox(field_name: &str, address: &str) -> Result<()> {
    validate_non_empty_string(field_name, address)?;
    address
        .parse::<lettre::Address>()
        .map(|_| ())
        .map_err(|e| ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: format!("Invalid mail address: {}", e),
        })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ContactError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContactError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("endpoint", "https://example.com/contact").is_ok());
        assert!(validate_url("endpoint", "http://127.0.0.1:8080/contact").is_ok());
        assert!(validate_url("endpoint", "").is_err());
        assert!(validate_url("endpoint", "contact.php").is_err());
        assert!(validate_url("endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_route_path() {
        assert!(validate_route_path("server.path", "/contact").is_ok());
        assert!(validate_route_path("server.path", "contact").is_err());
        assert!(validate_route_path("server.path", "").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "0.0.0.0:8080").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_mailbox() {
        assert!(validate_mailbox("mail.to", "office@example.com").is_ok());
        assert!(validate_mailbox("mail.to", "not-an-address").is_err());
        assert!(validate_mailbox("mail.to", "  ").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let host = Some("smtp.example.com".to_string());
        assert_eq!(validate_required_field("transport.host", &host).unwrap(), "smtp.example.com");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("transport.host", &missing),
            Err(ContactError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("rate_limit.min_interval_seconds", 3, 1).is_ok());
        assert!(validate_positive_number("rate_limit.min_interval_seconds", 0, 1).is_err());
    }
}
