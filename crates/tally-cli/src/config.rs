use std::fs;
use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anyhow::{
  Context,
  anyhow
};
use serde::{
  Deserialize,
  Serialize
};
use tally_shared::DEFAULT_API_BASE;
use tracing::{
  debug,
  info
};

pub const CONFIG_ENV: &str =
  "TALLY_CONFIG";
pub const API_BASE_ENV: &str =
  "TALLY_API_BASE";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  pub api_base:     String,
  pub timeout_secs: u64,
  pub data_dir:     Option<PathBuf>,
  pub color:        bool,
  #[serde(skip)]
  pub loaded_from:  Option<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_base:     DEFAULT_API_BASE
        .to_string(),
      timeout_secs: 30,
      data_dir:     None,
      color:        true,
      loaded_from:  None
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let path = resolve_config_path(
      config_override
    )?;

    let mut cfg = match path {
      | Some(path) if path.exists() => {
        info!(config = %path.display(), "loading config");
        Self::from_file(&path)?
      }
      | Some(path)
        if config_override.is_some() =>
      {
        return Err(anyhow!(
          "config file {} does not \
           exist",
          path.display()
        ));
      }
      | _ => {
        debug!(
          "no config file found; using \
           defaults"
        );
        Config::default()
      }
    };

    if let Ok(api_base) =
      std::env::var(API_BASE_ENV)
      && !api_base.trim().is_empty()
    {
      debug!(%api_base, "api base from environment");
      cfg.api_base = api_base;
    }

    Ok(cfg)
  }

  pub fn from_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text =
      fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    let mut cfg: Config =
      toml::from_str(&text)
        .with_context(|| {
          format!(
            "invalid config file {}",
            path.display()
          )
        })?;
    cfg.loaded_from =
      Some(path.to_path_buf());
    Ok(cfg)
  }

  /// Command-line flags win over the file and the environment.
  pub fn apply_overrides(
    &mut self,
    api_base: Option<String>,
    data_dir: Option<PathBuf>
  ) {
    if let Some(api_base) = api_base {
      debug!(%api_base, "api base from command line");
      self.api_base = api_base;
    }
    if let Some(data_dir) = data_dir {
      self.data_dir = Some(data_dir);
    }
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(
      self.timeout_secs.max(1)
    )
  }
}

#[tracing::instrument(skip(cfg))]
pub fn resolve_data_dir(
  cfg: &Config
) -> anyhow::Result<PathBuf> {
  let dir = match &cfg.data_dir {
    | Some(path) => expand_tilde(path),
    | None => default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(expand_tilde(path)));
  }

  if let Ok(from_env) =
    std::env::var(CONFIG_ENV)
  {
    if from_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      from_env
    )));
  }

  Ok(dirs::config_dir().map(|dir| {
    dir.join("tally").join("config.toml")
  }))
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let base = dirs::data_dir()
    .or_else(dirs::home_dir)
    .ok_or_else(|| {
      anyhow!(
        "cannot determine data \
         directory"
      )
    })?;
  Ok(base.join("tally"))
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
