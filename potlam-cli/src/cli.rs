//! Command line definition

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use potlam_client::models::{CashSessionStatus, Shift};

#[derive(Debug, Parser)]
#[command(name = "potlam", version, about = "Andhra Potlam operator console")]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "POTLAM_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(flatten)]
    pub credentials: Credentials,

    /// Log level for the potlam crates (overridden by RUST_LOG)
    #[arg(long, env = "POTLAM_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// JSON console logs
    #[arg(long, env = "POTLAM_LOG_JSON", global = true)]
    pub json_logs: bool,

    /// Also write rotating log files here
    #[arg(long, env = "POTLAM_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Sign-in credentials; the session lasts for this process only
#[derive(Debug, Clone, Args)]
pub struct Credentials {
    #[arg(long, env = "POTLAM_EMAIL", global = true)]
    pub email: Option<String>,

    #[arg(long, env = "POTLAM_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and report where the session lands
    Login,
    /// Show the signed-in user
    Whoami,
    /// Manage product categories (admin)
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Browse the storefront catalog
    #[command(subcommand)]
    Products(ProductCommand),
    /// Work with the server cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Day planning (admin)
    #[command(subcommand)]
    Plan(PlanCommand),
    /// Cash-box sessions (admin)
    #[command(subcommand)]
    Cashbox(CashboxCommand),
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List {
        /// Case-insensitive name filter
        #[arg(long)]
        filter: Option<String>,
    },
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    Show,
    Add {
        product_id: String,
        #[arg(default_value_t = 1)]
        quantity: u32,
    },
    /// Set an item's quantity; below 1 is ignored
    Set {
        item_id: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    Remove {
        item_id: String,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Save a day plan and expand it into tasks
    Generate {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = "morning")]
        shift: Shift,
        /// `RECIPE_ID` or `RECIPE_ID@HH:MM`, repeatable
        #[arg(long = "recipe", required = true, value_parser = parse_recipe_spec)]
        recipes: Vec<RecipeSpec>,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CashboxCommand {
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        status: Option<StatusArg>,
    },
    Open {
        session_type: String,
        /// Opening float
        #[arg(long)]
        amount: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Close {
        id: String,
        /// Counted closing amount
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Open,
    Closed,
}

impl From<StatusArg> for CashSessionStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Open => CashSessionStatus::Open,
            StatusArg::Closed => CashSessionStatus::Closed,
        }
    }
}

/// Recipe selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSpec {
    pub id: String,
    /// Raw `HH:MM`, validated by the planner
    pub start_time: Option<String>,
}

fn parse_recipe_spec(value: &str) -> Result<RecipeSpec, String> {
    let (id, start_time) = match value.split_once('@') {
        Some((id, time)) => {
            NaiveTime::parse_from_str(time, "%H:%M")
                .map_err(|_| format!("invalid start time '{time}', expected HH:MM"))?;
            (id, Some(time.to_string()))
        }
        None => (value, None),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err("recipe id is empty".into());
    }
    Ok(RecipeSpec {
        id: id.to_string(),
        start_time,
    })
}
