use anyhow::Context;
use chanakya_core::api::build::HttpBuildClient;
use chanakya_core::api::grow::HttpGrowClient;
use chanakya_core::api::BuildApi;
use chanakya_core::config::Settings;
use chanakya_core::directory::Directory;
use chanakya_core::domain::schedule::{flatten_available_slots, sort_slots_chronologically};
use chanakya_core::session::StaticSession;
use chanakya_core::views::ProfileSave;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod news;

#[derive(Debug, Parser)]
#[command(name = "chanakya", about = "Business advisor client")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct UserArgs {
    /// Identity-provider user id.
    #[arg(long)]
    uid: String,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    name: Option<String>,
}

impl UserArgs {
    fn session(&self) -> StaticSession {
        let mut session = StaticSession::signed_in(&self.uid);
        if let Some(email) = &self.email {
            session = session.with_email(email);
        }
        if let Some(name) = &self.name {
            session = session.with_display_name(name);
        }
        session
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Latest financial snapshot, history and industry.
    Dashboard(UserArgs),

    /// Latest financial entry and history. Any field flag saves an edited
    /// copy of the latest entry.
    Profile {
        #[command(flatten)]
        user: UserArgs,

        #[arg(long)]
        annual_revenue: Option<f64>,
        #[arg(long)]
        monthly_budget: Option<f64>,
        #[arg(long)]
        recurring_expenses: Option<f64>,
        #[arg(long)]
        savings: Option<f64>,
    },

    /// Revenue forecast, growth and margin classification.
    Analytics(UserArgs),

    /// Ask the financial advisor; each message is sent as its own turn.
    Chat {
        #[command(flatten)]
        user: UserArgs,

        #[arg(required = true)]
        messages: Vec<String>,
    },

    /// Request an emailed PDF report.
    Report {
        #[command(flatten)]
        user: UserArgs,

        #[arg(long, default_value = "")]
        prompt: String,
    },

    /// List venture capitalists.
    Vcs {
        #[arg(long)]
        domain: Option<String>,

        #[arg(long)]
        search: Option<String>,
    },

    /// One VC with its available slots.
    Vc {
        id: u64,

        /// Sort slots by calendar date instead of schedule order.
        #[arg(long)]
        sorted: bool,
    },

    /// Raw availability calendar of a VC.
    Availability { id: u64 },

    /// Book a meeting slot with a VC.
    Book {
        id: u64,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "")]
        startup: String,
        #[arg(long, default_value = "")]
        founder: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        pitch: String,
    },

    /// Market research on a startup idea.
    Research { input: String },

    /// Cycle the news carousel for a number of ticks.
    News {
        #[arg(long, default_value_t = 4)]
        ticks: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(&settings, args.command).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(settings: &Settings, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dashboard(user) => {
            let api = HttpGrowClient::from_settings(settings)?;
            let view = chanakya_core::views::load_dashboard(&api, &user.session(), None).await;
            print_json(&view)
        }
        Command::Profile {
            user,
            annual_revenue,
            monthly_budget,
            recurring_expenses,
            savings,
        } => {
            let api = HttpGrowClient::from_settings(settings)?;
            let session = user.session();
            let mut view = chanakya_core::views::load_profile(&api, &session, None)
                .await
                .context("profile view torn down")?;
            anyhow::ensure!(!view.error, "failed to load profile data");

            let edits = [annual_revenue, monthly_budget, recurring_expenses, savings];
            if edits.iter().any(Option::is_some) {
                let draft = view
                    .draft
                    .as_mut()
                    .context("no financial data on file to update")?;
                if let Some(v) = annual_revenue {
                    draft.annual_revenue = v;
                }
                if let Some(v) = monthly_budget {
                    draft.monthly_budget = v;
                }
                if let Some(v) = recurring_expenses {
                    draft.recurring_expenses = v;
                }
                if let Some(v) = savings {
                    draft.savings = v;
                }

                match chanakya_core::views::save_profile(&api, &session, &mut view).await {
                    ProfileSave::Saved => {}
                    ProfileSave::Incomplete => anyhow::bail!("user data is incomplete or missing"),
                    ProfileSave::Failed => anyhow::bail!("failed to save profile data"),
                }
            }
            print_json(&view)
        }
        Command::Analytics(user) => {
            let api = HttpGrowClient::from_settings(settings)?;
            let view = chanakya_core::views::load_analytics(&api, &user.session(), None).await;
            print_json(&view)
        }
        Command::Chat { user, messages } => {
            let api = HttpGrowClient::from_settings(settings)?;
            let view = chanakya_core::views::load_advisor(&api, &user.session(), None)
                .await
                .context("advisor view torn down")?;
            anyhow::ensure!(!view.error, "failed to load advisor context");
            let mut conversation = view
                .conversation
                .context("no financial data on file; update your profile first")?;

            for message in &messages {
                conversation.send(&api, message).await;
                anyhow::ensure!(!conversation.error, "advisor did not answer {message:?}");
            }
            print_json(&conversation.messages())
        }
        Command::Report { user, prompt } => {
            let api = HttpGrowClient::from_settings(settings)?;
            chanakya_core::report::report_latest(&api, &user.session(), &prompt).await?;
            print_json(&serde_json::json!({"status": "requested"}))
        }
        Command::Vcs { domain, search } => {
            let mut directory = Directory::new(HttpBuildClient::from_settings(settings)?);
            directory.load().await;
            anyhow::ensure!(!directory.has_error(), "failed to load vc directory");

            let mut listed = match &domain {
                Some(domain) => directory.filter_by_domain(domain),
                None => directory.vcs().iter().collect(),
            };
            if let Some(query) = &search {
                let matches: Vec<u64> = directory.search(query).iter().map(|vc| vc.id).collect();
                listed.retain(|vc| matches.contains(&vc.id));
            }
            print_json(&listed)
        }
        Command::Vc { id, sorted } => {
            let api = HttpBuildClient::from_settings(settings)?;
            let vc = api.get_vc(id).await?;
            let mut slots = flatten_available_slots(&vc.schedule);
            if sorted {
                sort_slots_chronologically(&mut slots);
            }
            print_json(&serde_json::json!({"venture_capitalist": vc, "available_slots": slots}))
        }
        Command::Availability { id } => {
            let api = HttpBuildClient::from_settings(settings)?;
            print_json(&api.availability(id).await?)
        }
        Command::Book {
            id,
            date,
            time,
            startup,
            founder,
            email,
            pitch,
        } => {
            let mut directory = Directory::new(HttpBuildClient::from_settings(settings)?);
            directory.load().await;
            anyhow::ensure!(
                directory.select(id).await,
                "failed to load VC {id}"
            );

            let slot = directory
                .available_slots()
                .into_iter()
                .find(|s| s.date == date && s.time == time)
                .with_context(|| format!("slot {date} {time} is not available"))?;
            directory.open_scheduling(&slot);
            if let Some(draft) = directory.draft_mut() {
                draft.startup_name = startup;
                draft.founder_name = founder;
                draft.email = email;
                draft.pitch_summary = pitch;
            }

            let confirmation = directory
                .submit()
                .await
                .context("meeting request was rejected")?;
            print_json(&confirmation)
        }
        Command::Research { input } => {
            let api = HttpBuildClient::from_settings(settings)?;
            let mut view = chanakya_core::research::ResearchView::default();
            chanakya_core::research::research(&api, &mut view, &input).await;
            anyhow::ensure!(!view.error, "market research failed");
            print_json(&view)
        }
        Command::News { ticks } => news::run(settings, ticks).await,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
