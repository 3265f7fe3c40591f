use std::env;
use std::path::PathBuf;

pub mod sled_access;
mod codec;
mod indexing;
pub mod tour_store;

///
/// Default location of the state database, or `None` if the user home (or `APPDATA` on Windows) is unknown
pub fn default_path() -> Option<PathBuf> {
    let mut dir = base_dir()?;
    dir.push("state");
    Some(dir)
}

#[cfg(all(
unix,
not(target_os = "macos"),
not(target_os = "ios"),
not(target_os = "android")
))]
fn base_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".travel-tours"))
}

#[cfg(target_os = "macos")]
fn base_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join("Library").join("TravelTours"))
}

#[cfg(target_os = "windows")]
fn base_dir() -> Option<PathBuf> {
    env::var_os("APPDATA").map(|app_data| PathBuf::from(app_data).join(".travel-tours"))
}

#[cfg(any(target_os = "ios", target_os = "android"))]
fn base_dir() -> Option<PathBuf> {
    // the app passes its own sandbox directory to `SledStorage::open`
    None
}
