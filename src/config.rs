use std::path::PathBuf;

/// Directories gcloud is commonly installed into, besides whatever is on PATH.
const FALLBACK_DIRS: &[&str] = &["/usr/local/bin", "/opt/homebrew/bin", "/usr/bin"];

pub struct Config {
    pub gcloud_override: Option<PathBuf>,
    pub search_dirs: Vec<PathBuf>,
    pub assume_yes: bool,
}

impl Config {
    pub fn new(gcloud_override: Option<PathBuf>) -> Self {
        let mut search_dirs = Vec::new();
        if let Some(home) = dirs::home_dir() {
            search_dirs.push(home.join("google-cloud-sdk").join("bin"));
        }
        search_dirs.extend(FALLBACK_DIRS.iter().map(PathBuf::from));

        Self {
            gcloud_override,
            search_dirs,
            assume_yes: false,
        }
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// PATH for spawned gcloud processes: the install locations first, then the inherited PATH.
    pub fn extended_path(&self) -> String {
        let mut parts: Vec<String> = self
            .search_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        parts.extend(["/bin", "/usr/sbin", "/sbin"].iter().map(|s| s.to_string()));
        if let Ok(path) = std::env::var("PATH") {
            if !path.is_empty() {
                parts.push(path);
            }
        }
        parts.join(":")
    }

    /// Candidate executables in lookup order: PATH entries, then install locations.
    pub fn gcloud_candidates(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        dirs.extend(self.search_dirs.iter().cloned());
        dirs.into_iter().map(|d| d.join("gcloud")).collect()
    }
}
