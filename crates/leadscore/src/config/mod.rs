use crate::evaluation::{BudgetConstraint, CostModel, FractionGrid, TargetingBudget};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub economics: EconomicsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            economics: EconomicsConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Business defaults applied when a request does not carry its own economics.
#[derive(Debug, Clone)]
pub struct EconomicsConfig {
    pub cost_model: CostModel,
    pub grid: FractionGrid,
    pub budget: Option<BudgetConstraint>,
    pub mean_historical_profit: Option<f64>,
}

impl EconomicsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let reference = CostModel::reference();
        let cost_model = CostModel {
            benefit_true_positive: number_or("LEAD_BENEFIT_TP", reference.benefit_true_positive)?,
            cost_false_positive: number_or("LEAD_COST_FP", reference.cost_false_positive)?,
            benefit_true_negative: number_or("LEAD_BENEFIT_TN", reference.benefit_true_negative)?,
            cost_false_negative: number_or("LEAD_COST_FN", reference.cost_false_negative)?,
        };

        let grid_step = number_or("LEAD_GRID_STEP", 0.01)?;
        let grid = FractionGrid::from_step(grid_step).map_err(|_| ConfigError::InvalidNumber {
            key: "LEAD_GRID_STEP",
            value: grid_step.to_string(),
        })?;

        let budget = match (
            optional_number("LEAD_BUDGET")?,
            optional_number("LEAD_COST_PER_LEAD")?,
        ) {
            (Some(budget), Some(cost_per_lead)) => Some(BudgetConstraint::Spend(
                TargetingBudget::new(budget, cost_per_lead),
            )),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingPair("LEAD_COST_PER_LEAD")),
            (None, Some(_)) => return Err(ConfigError::MissingPair("LEAD_BUDGET")),
        };

        Ok(Self {
            cost_model,
            grid,
            budget,
            mean_historical_profit: optional_number("LEAD_MEAN_HISTORICAL_PROFIT")?,
        })
    }
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            cost_model: CostModel::reference(),
            grid: FractionGrid::percent(),
            budget: None,
            mean_historical_profit: None,
        }
    }
}

fn optional_number(key: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
        Err(_) => Ok(None),
    }
}

fn number_or(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    Ok(optional_number(key)?.unwrap_or(default))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    MissingPair(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a finite number, got '{value}'")
            }
            ConfigError::MissingPair(key) => {
                write!(f, "{key} is required when a budget is configured")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::MissingPair(_) => None,
        }
    }
}
