//! A terminal stand-in for the photo app.
//!
//! Reads one command per line from stdin and drives a `FolioClient` the
//! way the app's screens would. Start it with
//!
//! ```text
//! photo-client [--offline] [--data <dir>] [--url <base-url>]
//! ```
//!
//! `--offline` swaps the REST directory for an in-memory one. `--data`
//! persists the session so it survives a restart. Set `RUST_LOG` for more
//! or less logging.

use std::path::PathBuf;

use folio::directory::parse_dob;
use folio::prelude::*;
use folio::AnyStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Register(RegistrationForm),
    Login(LoginForm),
    Logout,
    Pick(Vec<String>),
    Clear,
    Status,
    Help,
    Quit,
}

const USAGE: &str = "\
commands:
  register <username> <email> <YYYY-MM-DD> <password>
  login <email> <password>
  logout
  pick <uri>...        add photos (home screen only)
  clear                remove every photo
  status
  help
  quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Help);
    };
    let args: Vec<&str> = words.collect();

    match (verb, args.as_slice()) {
        ("register", [username, email, dob, password]) => {
            let dob = parse_dob(dob).ok_or_else(|| format!("bad date {dob:?}"))?;
            Ok(Command::Register(RegistrationForm {
                username: username.to_string(),
                email: email.to_string(),
                dob: Some(dob),
                password: password.to_string(),
            }))
        }
        ("login", [email, password]) => {
            Ok(Command::Login(LoginForm::new(*email, *password)))
        }
        ("logout", []) => Ok(Command::Logout),
        ("pick", uris) => {
            Ok(Command::Pick(uris.iter().map(|u| u.to_string()).collect()))
        }
        ("clear", []) => Ok(Command::Clear),
        ("status", []) => Ok(Command::Status),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", _) => Ok(Command::Quit),
        _ => Err(format!("can't parse {line:?}, try `help`")),
    }
}

// ---------------------------------------------------------------------------
// Picker
// ---------------------------------------------------------------------------

/// Hands back whatever URIs were typed after `pick`; none means the user
/// dismissed the picker.
struct TypedPicker(Vec<String>);

impl ImagePicker for TypedPicker {
    async fn pick(&self, _options: &PickerOptions) -> PickerResponse {
        if self.0.is_empty() {
            PickerResponse::cancelled()
        } else {
            PickerResponse::with_uris(self.0.clone())
        }
    }
}

// ---------------------------------------------------------------------------
// App loop
// ---------------------------------------------------------------------------

struct Args {
    offline: bool,
    data_dir: Option<PathBuf>,
    base_url: Option<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args {
        offline: false,
        data_dir: None,
        base_url: None,
    };
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--offline" => parsed.offline = true,
            "--data" => {
                parsed.data_dir =
                    Some(args.next().ok_or("--data needs a directory")?.into());
            }
            "--url" => {
                parsed.base_url = Some(args.next().ok_or("--url needs a value")?);
            }
            other => return Err(format!("unknown argument {other:?}")),
        }
    }
    Ok(parsed)
}

fn print_screen(router: &Router, session: &Session, gallery: &Gallery) {
    match (router.current(), session.user()) {
        (Screen::Home, Some(user)) => {
            println!("[home] {}", greeting(user));
            match gallery.placeholder() {
                Some(text) => println!("  {text}"),
                None => {
                    for row in gallery.rows() {
                        println!("  {}", row.join("  "));
                    }
                }
            }
        }
        (screen, _) => {
            let screen = screen.to_string().to_lowercase();
            match session.error() {
                Some(reason) => println!("[{screen}] {reason}"),
                None if session.is_loading() => println!("[{screen}] logging in..."),
                None => println!("[{screen}]"),
            }
        }
    }
}

async fn run<S, D>(client: FolioClient<S, D>) -> Result<(), Box<dyn std::error::Error>>
where
    S: KeyValueStore,
    D: DirectoryService,
{
    client.start().await;
    let mut router = client.router();
    let mut gallery = Gallery::new();
    print_screen(&router, &client.session(), &gallery);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Register(form) => {
                let today = chrono::Local::now().date_naive();
                match client.register(&form, today).await {
                    Ok(user) => println!("registered {} as {}", user.email, user.id),
                    Err(e) => println!("{}", e.user_message()),
                }
            }
            Command::Login(form) => {
                if let Err(e) = client.login(&form).await {
                    println!("{}", e.user_message());
                }
            }
            Command::Logout => {
                client.logout().await;
            }
            Command::Pick(uris) => {
                if router.current() != Screen::Home {
                    println!("log in to pick photos");
                    continue;
                }
                let added = gallery.pick_from(&TypedPicker(uris)).await;
                println!("added {added} photo(s)");
            }
            Command::Clear => gallery.clear(),
            Command::Status => {}
            Command::Help => {
                println!("{USAGE}");
                continue;
            }
            Command::Quit => break,
        }

        let session = client.session();
        if let Some(set) = router.observe(&session) {
            tracing::debug!(%set, "screen set switched");
            // Leaving the home screen drops its photos.
            if set == ScreenSet::Auth {
                gallery.clear();
            }
        }
        print_screen(&router, &session, &gallery);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    if args.offline {
        let store = match &args.data_dir {
            Some(dir) => AnyStore::File(FileStore::new(dir)?),
            None => AnyStore::Memory(MemoryStore::new()),
        };
        eprintln!("starting photo client (offline directory)");
        let client = FolioClient::new(
            store,
            InMemoryDirectory::new(),
            SessionConfig::default(),
        );
        return run(client).await;
    }

    let mut builder = FolioClient::builder();
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(dir) = args.data_dir {
        builder = builder.data_dir(dir);
    }
    eprintln!("starting photo client");
    run(builder.build_http()?).await
}
