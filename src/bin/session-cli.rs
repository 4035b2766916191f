//! 인증 세션 CLI
//!
//! 인증 API를 호출하고 토큰 쌍을 JSON 파일에 보관합니다. 저장된 액세스
//! 토큰이 만료되면 세션 매니저가 리프레시 토큰으로 자동 갱신합니다.
//!
//! ```bash
//! session-cli login --email a@b.com --password secret
//! session-cli profile
//! session-cli logout
//! ```

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;

use users_auth_service::client::{AuthClient, ClientError, FileStorage, SessionStatus};
use users_auth_service::domain::dto::users::{IdentityRecord, LoginRequest, RegisterRequest};

/// Auth session CLI
#[derive(Parser)]
#[command(name = "session-cli", about = "Auth service session CLI", version)]
struct Cli {
    /// Session file path
    #[arg(long, env = "SESSION_FILE", default_value = ".auth-session.json", global = true)]
    session_file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register(RegisterArgs),
    /// Log in and store the session
    Login(CredentialArgs),
    /// Show the stored session and revalidate it with the server
    Status,
    /// Fetch the current profile
    Profile,
    /// Log out and clear the stored session
    Logout,
    /// Request a password reset email
    ForgotPassword(EmailArgs),
    /// Reset the password with a token from the email
    ResetPassword(ResetPasswordArgs),
    /// Verify the email address with a token from the email
    VerifyEmail(TokenArgs),
    /// Send the verification email again
    ResendVerification(EmailArgs),
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(short, long)]
    email: String,

    #[arg(short, long, env = "AUTH_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct RegisterArgs {
    #[command(flatten)]
    credentials: CredentialArgs,

    /// Display name
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Args)]
struct EmailArgs {
    #[arg(short, long)]
    email: String,
}

#[derive(Args)]
struct TokenArgs {
    token: String,
}

#[derive(Args)]
struct ResetPasswordArgs {
    token: String,

    #[arg(short, long, env = "AUTH_NEW_PASSWORD", hide_env_values = true)]
    new_password: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let client = AuthClient::from_env(Arc::new(FileStorage::new(&cli.session_file)))?;

    let result = run(&client, cli.command).await;
    if let Err(ClientError::SessionExpired) = result {
        println!("⚠️  Session expired. Run `session-cli login` again.");
        return Ok(());
    }
    result.map_err(Into::into)
}

async fn run(client: &AuthClient, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::Register(args) => {
            let request = RegisterRequest {
                email: args.credentials.email,
                password: args.credentials.password,
                name: args.name,
            };
            let response = client.register(&request).await?;
            println!("✅ {}", response.message);
        }
        Commands::Login(args) => {
            let request = LoginRequest {
                email: args.email,
                password: args.password,
            };
            let login = client.login(&request).await?;
            println!("✅ Logged in");
            print_user(&login.user);
        }
        Commands::Status => status(client).await?,
        Commands::Profile => {
            let user = client.profile().await?;
            print_user(&user);
        }
        Commands::Logout => {
            client.logout().await?;
            println!("👋 Logged out");
        }
        Commands::ForgotPassword(args) => {
            let response = client.forgot_password(&args.email).await?;
            println!("📧 {}", response.message);
        }
        Commands::ResetPassword(args) => {
            let response = client.reset_password(&args.token, &args.new_password).await?;
            println!("✅ {}", response.message);
        }
        Commands::VerifyEmail(args) => {
            let response = client.verify_email(&args.token).await?;
            println!("✅ {}", response.message);
        }
        Commands::ResendVerification(args) => {
            let response = client.resend_verification(&args.email).await?;
            println!("📧 {}", response.message);
        }
    }
    Ok(())
}

async fn status(client: &AuthClient) -> Result<(), ClientError> {
    let (stored, revalidation) = client.manager().init()?;

    match &stored {
        SessionStatus::Anonymous => {
            println!("Not logged in.");
            return Ok(());
        }
        SessionStatus::Authenticated(user) => println!("📋 Stored session for {}", user.email),
    }

    let revalidated = revalidation
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))??;
    match revalidated {
        SessionStatus::Authenticated(user) => {
            println!("✅ Session is valid");
            print_user(&user);
        }
        SessionStatus::Anonymous => println!("⚠️  Stored session is no longer valid and was cleared."),
    }
    Ok(())
}

fn print_user(user: &IdentityRecord) {
    println!("   ID: {}", user.id);
    println!("   Email: {}", user.email);
    println!("   Name: {}", user.name);
    println!("   Role: {}", user.role);
    println!(
        "   Email verified: {}",
        if user.email_verified { "yes" } else { "no" }
    );
}
