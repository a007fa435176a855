use secrecy::SecretString;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_PATH: &str = "data/fasting.json";
const DEFAULT_FASTING_SHEET: &str = "Fasting_Plan";
const DEFAULT_MEAL_SHEET: &str = "Planovane_Jedlo";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set when APP_STORE=sheets")]
    Missing(&'static str),
    #[error("unknown APP_STORE '{0}', expected 'sheets' or 'file'")]
    UnknownStore(String),
    #[error("PORT '{0}' is not a valid port number")]
    InvalidPort(String),
}

#[derive(Debug)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub credentials: SecretString,
    pub fasting_sheet: String,
    pub meal_sheet: String,
}

#[derive(Debug)]
pub enum StoreSettings {
    Sheets(SheetsSettings),
    File(PathBuf),
}

#[derive(Debug)]
pub struct Settings {
    pub port: u16,
    pub api_key: Option<SecretString>,
    pub store: StoreSettings,
}

impl Settings {
    /// Reads settings from the process environment, after loading `.env` if
    /// one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let backend = var("APP_STORE").unwrap_or_else(|| {
            if var("SPREADSHEET_ID").is_some() {
                "sheets".to_string()
            } else {
                "file".to_string()
            }
        });

        let store = match backend.as_str() {
            "sheets" => StoreSettings::Sheets(SheetsSettings {
                spreadsheet_id: var("SPREADSHEET_ID").ok_or(ConfigError::Missing("SPREADSHEET_ID"))?,
                credentials: var("GOOGLE_CREDENTIALS_BASE64")
                    .map(SecretString::from)
                    .ok_or(ConfigError::Missing("GOOGLE_CREDENTIALS_BASE64"))?,
                fasting_sheet: var("SHEET_NAME_FASTING")
                    .unwrap_or_else(|| DEFAULT_FASTING_SHEET.to_string()),
                meal_sheet: var("SHEET_NAME_JEDLO").unwrap_or_else(|| DEFAULT_MEAL_SHEET.to_string()),
            }),
            "file" => StoreSettings::File(resolve_data_path(var("APP_DATA_PATH"))),
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        Ok(Self {
            port,
            api_key: var("API_KEY").map(SecretString::from),
            store,
        })
    }
}

fn resolve_data_path(configured: Option<String>) -> PathBuf {
    configured.map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from)
}
