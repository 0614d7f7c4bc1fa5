//! Mapping of parsed WHOIS fields onto a registration record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::RegistrationRecord;

/// Builds the record for `domain` from the registry's parsed fields.
///
/// The domain name alone is not registration data: without a registrar, a
/// date or a name server there is no record.
pub(super) fn registration_record(
    domain: &str,
    registrar: Option<&str>,
    creation_date: Option<&str>,
    expiration_date: Option<&str>,
    name_servers: &[String],
) -> Option<RegistrationRecord> {
    let registrar = usable(registrar).map(str::to_string);
    let creation_date = usable(creation_date).map(format_date);
    let expiration_date = usable(expiration_date).map(format_date);
    let name_servers = join_name_servers(name_servers);

    if registrar.is_none()
        && creation_date.is_none()
        && expiration_date.is_none()
        && name_servers.is_none()
    {
        return None;
    }

    RegistrationRecord::from_fields(
        Some(domain.to_lowercase()),
        registrar,
        creation_date,
        expiration_date,
        name_servers,
    )
}

fn usable(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.to_lowercase().contains("redacted"))
}

fn join_name_servers(servers: &[String]) -> Option<String> {
    let mut unique: Vec<String> = Vec::new();
    for server in servers {
        let server = server
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_end_matches('.')
            .to_lowercase();
        if !server.is_empty() && !unique.contains(&server) {
            unique.push(server);
        }
    }
    if unique.is_empty() {
        None
    } else {
        Some(unique.join(", "))
    }
}

/// Renders a WHOIS date as `YYYY-MM-DD HH:MM:SS` (UTC) when it can be parsed,
/// otherwise returns the registry's text unchanged.
fn format_date(raw: &str) -> String {
    parse_date(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let cleaned = date_str
        .trim()
        .replace(" (UTC)", "")
        .replace(" UTC", "Z")
        .replace(" +0000", "Z");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%d %H:%M:%SZ",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, format) {
            return Some(dt.and_utc());
        }
    }

    let date_formats = [
        "%Y-%m-%d", "%d-%b-%Y", "%d-%B-%Y", "%Y.%m.%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y",
    ];
    for format in &date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(&cleaned, format) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}
