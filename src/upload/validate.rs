use serde::Serialize;

use super::{LocalFile, UploadPolicy, MIB};

/// Outcome of checking one file against a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Validation {
            valid: true,
            error: None,
        }
    }

    fn fail(reason: String) -> Self {
        Validation {
            valid: false,
            error: Some(reason),
        }
    }
}

/// Check the type allowlist, then the size ceiling.
///
/// A file failing both reports the type failure.
pub fn validate_file(policy: &UploadPolicy, file: &LocalFile) -> Validation {
    if !policy.allows_type(file.mime_type()) {
        return Validation::fail(format!(
            "Invalid file type \"{}\". Allowed types: {}",
            file.mime_type(),
            policy.allowed_types.join(", ")
        ));
    }

    if file.size() > policy.max_bytes {
        return Validation::fail(format!(
            "File size exceeds the {} limit",
            format_size(policy.max_bytes)
        ));
    }

    Validation::ok()
}

/// Human-readable byte count: `5MB`, `1.5MB`, `200KB`, `12 bytes`.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    if bytes >= MIB {
        if bytes % MIB == 0 {
            format!("{}MB", bytes / MIB)
        } else {
            format!("{:.1}MB", bytes as f64 / MIB as f64)
        }
    } else if bytes >= KIB {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}
