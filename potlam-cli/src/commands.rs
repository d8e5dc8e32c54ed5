//! Command execution
//!
//! Each invocation builds one client, signs in when the command needs a
//! session, runs the command and prints the result on stdout. Notices go to
//! the log.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, bail};
use potlam_client::forms::CategoryForm;
use potlam_client::models::{Category, ProductQuery, Ref, User};
use potlam_client::navigation::LOGIN_PATH;
use potlam_client::{
    AuthSession, AutoConfirm, CartStore, CashBox, ClientConfig, Confirm, CrudScreen, DayPlanner,
    GateDecision, HttpClient, MemoryNavigator, Navigator, NetworkHttpClient, Notifier,
    TracingNotifier, api,
};

use crate::cli::{
    CartCommand, CashboxCommand, CategoryCommand, Command, Credentials, PlanCommand,
    ProductCommand,
};

/// Client wiring for one invocation
pub struct Console {
    client: Arc<NetworkHttpClient>,
    navigator: Arc<MemoryNavigator>,
    auth: Arc<AuthSession>,
    notifier: Arc<dyn Notifier>,
    credentials: Credentials,
}

impl Console {
    pub fn new(config: &ClientConfig, credentials: Credentials) -> anyhow::Result<Self> {
        // Start on the login page: a rejected sign-in must not redirect
        let navigator = Arc::new(MemoryNavigator::new(LOGIN_PATH));
        let client = Arc::new(
            NetworkHttpClient::new(config, navigator.clone())
                .context("failed to build HTTP client")?,
        );
        let auth = Arc::new(AuthSession::new(client.clone()));
        Ok(Self {
            client,
            navigator,
            auth,
            notifier: Arc::new(TracingNotifier),
            credentials,
        })
    }

    pub async fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Login => {
                let user = self.sign_in().await?;
                println!(
                    "Signed in as {} ({}), landing on {}",
                    user.full_name(),
                    user.role,
                    self.navigator.current_path()
                );
            }
            Command::Whoami => {
                self.sign_in().await?;
                match self.auth.check_auth().await? {
                    Some(user) => println!("{} <{}> role={}", user.full_name(), user.email, user.role),
                    None => bail!("not signed in"),
                }
            }
            Command::Categories(command) => self.categories(command).await?,
            Command::Products(command) => self.products(command).await?,
            Command::Cart(command) => self.cart(command).await?,
            Command::Plan(command) => self.plan(command).await?,
            Command::Cashbox(command) => self.cashbox(command).await?,
        }
        Ok(())
    }

    async fn sign_in(&self) -> anyhow::Result<User> {
        let (Some(email), Some(password)) = (&self.credentials.email, &self.credentials.password)
        else {
            bail!("--email and --password (or POTLAM_EMAIL / POTLAM_PASSWORD) are required");
        };
        let user = self
            .auth
            .login(email, password)
            .await
            .with_context(|| format!("sign-in failed for {email}"))?;
        Ok(user)
    }

    /// Sign in and pass the admin gate the screens use
    async fn admin_screen<R: potlam_client::Resource>(
        &self,
        confirm: Arc<dyn Confirm>,
    ) -> anyhow::Result<CrudScreen<R>> {
        self.sign_in().await?;
        let screen = CrudScreen::new(
            self.client.clone(),
            self.auth.clone(),
            self.notifier.clone(),
            confirm,
        );
        match screen.mount().await {
            GateDecision::Render => Ok(screen),
            GateDecision::Redirect(target) => bail!("admin access required (sent to {target})"),
            GateDecision::Pending => bail!("session could not be resolved"),
        }
    }

    async fn categories(&self, command: CategoryCommand) -> anyhow::Result<()> {
        match command {
            CategoryCommand::List { filter } => {
                let screen = self.admin_screen::<Category>(Arc::new(AutoConfirm(false))).await?;
                screen.set_filter(filter.as_deref().unwrap_or_default()).await;
                for category in screen.visible().await {
                    let state = if category.is_active { "active" } else { "inactive" };
                    println!("{}\t{}\t{}\t{state}", category.id, category.name, category.slug);
                }
            }
            CategoryCommand::Create { name, description } => {
                let screen = self.admin_screen::<Category>(Arc::new(AutoConfirm(false))).await?;
                screen.set_form(CategoryForm { name, description }).await;
                let created = screen.submit().await?;
                println!("Created {} ({})", created.name, created.slug);
            }
            CategoryCommand::Delete { id, yes } => {
                let confirm: Arc<dyn Confirm> = if yes {
                    Arc::new(AutoConfirm(true))
                } else {
                    Arc::new(prompt)
                };
                let screen = self.admin_screen::<Category>(confirm).await?;
                if screen.delete(&id).await? {
                    println!("Deleted {id}");
                } else {
                    println!("Cancelled");
                }
            }
        }
        Ok(())
    }

    async fn products(&self, command: ProductCommand) -> anyhow::Result<()> {
        let ProductCommand::List { category, search } = command;
        let query = ProductQuery { category, search };
        for product in api::catalog::browse(&*self.client, &query).await? {
            println!(
                "{}\t{}\t{:.2}\tstock {}",
                product.id, product.name, product.price, product.stock
            );
        }
        Ok(())
    }

    async fn cart(&self, command: CartCommand) -> anyhow::Result<()> {
        self.sign_in().await?;
        let cart = CartStore::new(self.client.clone(), self.auth.clone(), self.notifier.clone());
        cart.refresh().await?;

        match command {
            CartCommand::Show => {}
            CartCommand::Add {
                product_id,
                quantity,
            } => cart.add(&product_id, quantity).await?,
            CartCommand::Set { item_id, quantity } => {
                cart.update_quantity(&item_id, quantity).await?
            }
            CartCommand::Remove { item_id } => cart.remove(&item_id).await?,
            CartCommand::Clear => cart.clear().await?,
        }

        let snapshot = cart.snapshot();
        for item in &snapshot.items {
            let name = match &item.product {
                Ref::Doc(product) => product.name.as_str(),
                Ref::Id(id) => id.as_str(),
            };
            println!("{}\t{name}\t{} x {:.2}", item.id, item.quantity, item.price);
        }
        println!("{} items, total {:.2}", cart.total_items(), cart.total_price());
        Ok(())
    }

    async fn plan(&self, command: PlanCommand) -> anyhow::Result<()> {
        let PlanCommand::Generate {
            date,
            shift,
            recipes,
            notes,
        } = command;
        self.sign_in().await?;

        let planner = DayPlanner::new(self.client.clone(), self.notifier.clone(), date);
        planner.set_shift(shift).await;
        planner.load_recipes().await?;
        for spec in &recipes {
            if !planner.add_recipe(&spec.id).await? {
                tracing::warn!(recipe = %spec.id, "Recipe listed twice, ignoring");
                continue;
            }
            if let Some(time) = &spec.start_time {
                planner.set_start_time(&spec.id, time).await?;
            }
        }
        planner.set_notes(&notes).await;

        let generated = planner.generate_tasks().await?;
        if let Some(id) = planner.plan_id().await {
            println!("Day plan {id}");
        }
        for task in &generated.tasks {
            println!(
                "{}\t{}\t{:?}\t{} min",
                task.id,
                task.title,
                task.priority,
                task.estimated_duration.unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn cashbox(&self, command: CashboxCommand) -> anyhow::Result<()> {
        self.sign_in().await?;
        let cashbox = CashBox::new(self.client.clone(), self.notifier.clone());

        let sessions = match command {
            CashboxCommand::List { date, status } => {
                cashbox.list_sessions(date, status.map(Into::into)).await?
            }
            CashboxCommand::Open {
                session_type,
                amount,
                date,
                notes,
            } => {
                let date = date.unwrap_or_else(|| {
                    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
                });
                let opened = cashbox
                    .open_session(&session_type, &date, &amount, &notes)
                    .await?;
                vec![opened]
            }
            CashboxCommand::Close { id, amount, notes } => {
                vec![cashbox.close_session(&id, &amount, &notes).await?]
            }
        };

        for session in &sessions {
            let net = session
                .net()
                .map(|n| format!("{n:.2}"))
                .unwrap_or_else(|| "-".into());
            println!(
                "{}\t{}\t{}\t{:?}\topening {:.2}\tnet {net}",
                session.id,
                session.date,
                session.display_name(),
                session.status,
                session.opening_amount
            );
        }
        Ok(())
    }

    /// Cookies held for this process
    pub fn cookie_names(&self) -> Vec<String> {
        self.client.cookie_jar().names()
    }
}

/// Interactive confirmation on the terminal
fn prompt(message: &str) -> bool {
    print!("{message} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
