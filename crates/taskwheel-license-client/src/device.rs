use std::fs;
use std::io;
use std::path::Path;

use rand::RngExt;

/// Load the per-installation device identifier, generating and persisting it
/// on first call. The identifier lives as long as the installation and is
/// never rotated; it is the binding key in every verification call.
pub fn get_or_create(path: &Path) -> io::Result<String> {
    if let Ok(existing) = fs::read_to_string(path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return Ok(existing.to_owned());
        }
    }

    let id = generate_device_id();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &id)?;
    Ok(id)
}

/// UUID-shaped identifier. Prefers the OS random source; environments without
/// one fall back to a pseudo-random generator producing the same textual
/// shape, so callers see no difference.
fn generate_device_id() -> String {
    let mut bytes = [0u8; 16];
    if getrandom::fill(&mut bytes).is_err() {
        let mut rng = rand::rng();
        for b in bytes.iter_mut() {
            *b = rng.random();
        }
    }
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}
