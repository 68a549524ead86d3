use std::{
    env, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;

use crate::constants::{PATH_SETTINGS, STORAGE_KEY};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Self {
        let data_dir = resolve_data_dir(
            data_dir_flag,
            env::var_os(PATH_SETTINGS.data_dir_env).map(PathBuf::from),
        );
        let log_dir = get_state_dir().unwrap_or_else(|| data_dir.clone());
        AppConfig { data_dir, log_dir }
    }
}

fn resolve_data_dir(flag: Option<PathBuf>, env_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag.or(env_dir) {
        fs::create_dir_all(&dir).ok();
        return dir;
    }

    let local = Path::new(".").join(format!("{}.json", STORAGE_KEY));
    if local.exists() {
        return PathBuf::from(".");
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "notebox", "notebox") {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        data_dir
    } else {
        PathBuf::from(".")
    }
}

fn get_state_dir() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "notebox", "notebox")?;
    let dir = proj_dirs.state_dir()?.to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_flag_wins_over_env() {
        let flag = TempDir::new().unwrap();
        let env_dir = TempDir::new().unwrap();
        let resolved = resolve_data_dir(
            Some(flag.path().to_path_buf()),
            Some(env_dir.path().to_path_buf()),
        );
        assert_eq!(resolved, flag.path());
    }

    #[test]
    fn test_env_dir_is_created() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("nested").join("notes");
        let resolved = resolve_data_dir(None, Some(nested.clone()));
        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
    }
}
