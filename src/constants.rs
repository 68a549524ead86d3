use ratatui::style::Color;

pub const STORAGE_KEY: &str = "notesData";

pub const ALL_NOTES_LABEL: &str = "All Notes";

pub const SEED_NOTES: &str = include_str!("../assets/notes.json");

pub const CATEGORY_COLORS: CategoryColors = CategoryColors {
    work: Color::Rgb(0, 153, 255),
    personal: Color::Rgb(255, 153, 0),
    ideas: Color::Rgb(153, 0, 255),
    all: Color::White,
};

pub const TIME_SETTINGS: TimeSettings = TimeSettings { poll_ms: 50 };

pub const STORAGE_SETTINGS: StorageSettings = StorageSettings {
    max_backups: 10,
    backup_dir: "backups",
};

pub const PATH_SETTINGS: PathSettings = PathSettings {
    data_dir_env: "NOTEBOX_DATA_DIR",
    log_filter_env: "NOTEBOX_LOG",
    log_file: "notebox.log",
    default_log_filter: "info",
};

pub struct CategoryColors {
    pub work: Color,
    pub personal: Color,
    pub ideas: Color,
    pub all: Color,
}

pub struct TimeSettings {
    pub poll_ms: u64,
}

pub struct StorageSettings {
    pub max_backups: usize,
    pub backup_dir: &'static str,
}

pub struct PathSettings {
    pub data_dir_env: &'static str,
    pub log_filter_env: &'static str,
    pub log_file: &'static str,
    pub default_log_filter: &'static str,
}
