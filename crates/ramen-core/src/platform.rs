use std::path::PathBuf;

const APP_DIR: &str = "ramen";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/ramen/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(temp_dir)
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        // Portable installs keep a data/ folder beside the executable
        if let Some(dir) = exe_dir() {
            let portable_data = dir.join("data");
            if portable_data.exists() {
                return portable_data;
            }
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        if let Some(dir) = exe_dir() {
            if dir.join("config.toml").exists() {
                return dir;
            }
        }
    }

    // On macOS and Linux, always use ~/.config/ramen/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(windows)]
fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_dirs_are_app_scoped() {
        assert!(data_dir().ends_with(".local/share/ramen"));
        assert!(config_dir().ends_with(".config/ramen"));
    }
}
