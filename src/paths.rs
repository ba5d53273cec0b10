use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths {
    pub config: PathBuf,
    pub arrangements: PathBuf,
}

impl AppPaths {
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("com", "modpackdesigner", "ModpackDesigner").map(|dirs| Self {
            config: dirs.config_dir().to_path_buf(),
            arrangements: dirs.data_dir().join("arrangements"),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config)?;
        fs::create_dir_all(&self.arrangements)?;
        Ok(())
    }
}
