use std::{fs, io};

use sha2::{Digest, Sha256};

use crate::{bot::LicenseStore, errors::LicenseError};

/* License validation.
 * A license is bound to one machine through its HWID,
 * the hex SHA-256 digest of the host's machine id.
 */

const MACHINE_ID_PATHS: [&str; 2] = ["/var/lib/dbus/machine-id", "/etc/machine-id"];

// Computes the HWID. `machine_id` overrides the id read from the OS.
// Whitespace is removed and the id lowercased before hashing.
pub fn machine_hwid(machine_id: Option<&str>) -> io::Result<String> {
    let raw = match machine_id {
        Some(id) => id.to_string(),
        None => read_machine_id()?,
    };

    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if normalized.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "the machine id is empty",
        ));
    }

    Ok(format!("{:x}", Sha256::digest(normalized.as_bytes())))
}

fn read_machine_id() -> io::Result<String> {
    let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no machine id found");
    for path in MACHINE_ID_PATHS {
        match fs::read_to_string(path) {
            Ok(id) if !id.trim().is_empty() => return Ok(id),
            Ok(_) => log::debug!("License - Machine id file {} is empty", path),
            Err(err) => {
                log::debug!("License - Could not read machine id file {}: {}", path, err);
                last_err = err;
            }
        }
    }
    Err(last_err)
}

/* Checks that `license_key` names an active license bound to `hwid`.
 * A missing license is invalid even if the key is blank.
 */
pub async fn validate_license<L: LicenseStore>(
    store: &L,
    license_key: &str,
    hwid: &str,
) -> Result<(), LicenseError> {
    let license = match store.find_license(license_key).await? {
        Some(license) => license,
        None => return Err(LicenseError::Invalid),
    };

    if !license.active {
        return Err(LicenseError::Inactive);
    }
    if license.hwid != hwid {
        return Err(LicenseError::HwidMismatch(hwid.to_string()));
    }
    Ok(())
}
