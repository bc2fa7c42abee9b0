use anyhow::Context;
use carepoint::cli::create_admin;
use carepoint_config::DatabaseConfig;
use carepoint_db::{PgUserRepository, init_db_pool, run_migrations};
use carepoint_models::{Gender, RegisterUserDto};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "carepoint-cli")]
#[command(about = "CarePoint CLI - Administrative tools for CarePoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// National identity card number
        #[arg(long)]
        nic: Option<String>,

        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: Option<NaiveDate>,

        /// Male or Female
        #[arg(long)]
        gender: Option<Gender>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

fn prompt_text(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

fn prompt_gender(value: Option<Gender>) -> anyhow::Result<Gender> {
    match value {
        Some(gender) => Ok(gender),
        None => Input::<Gender>::new()
            .with_prompt("Gender (Male/Female)")
            .interact_text()
            .context("Failed to read gender"),
    }
}

fn prompt_dob(value: Option<NaiveDate>) -> anyhow::Result<NaiveDate> {
    match value {
        Some(dob) => Ok(dob),
        None => Input::<NaiveDate>::new()
            .with_prompt("Date of birth (YYYY-MM-DD)")
            .interact_text()
            .context("Failed to read date of birth"),
    }
}

fn prompt_password(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(password) => Ok(password),
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            phone,
            nic,
            dob,
            gender,
            password,
        } => {
            let dto = RegisterUserDto {
                first_name: Some(prompt_text(first_name, "First name")?),
                last_name: Some(prompt_text(last_name, "Last name")?),
                email: Some(prompt_text(email, "Email address")?),
                phone: Some(prompt_text(phone, "Phone")?),
                nic: Some(prompt_text(nic, "NIC")?),
                dob: Some(prompt_dob(dob)?),
                gender: Some(prompt_gender(gender)?),
                password: Some(prompt_password(password)?),
            };

            let config = DatabaseConfig::from_env();
            let pool = init_db_pool(&config)
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            let users = PgUserRepository::new(pool, config.timeout);

            match create_admin(&users, dto).await {
                Ok(admin) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Email: {}", admin.email);
                    println!("   Name: {} {}", admin.first_name, admin.last_name);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating admin: {}", e.public_message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
