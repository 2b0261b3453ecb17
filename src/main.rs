use clap::Parser;
use sshfe::config::{Args, Command, Settings};
use sshfe::explorer::{FileExplorer, SshFileExplorer};
use sshfe::server::Server;
use std::io::Write;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // stdout carries JSON, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = Settings::from_args(&args)?;

    if let Command::Serve = args.command {
        let mut server = Server::new(settings);
        if let Err(e) = server.run() {
            error!("Server error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Err(e) = run_once(&args, &settings) {
        error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run_once(args: &Args, settings: &Settings) -> anyhow::Result<()> {
    let user = args
        .user
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--user is required"))?;
    let password = args
        .password
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--password is required"))?;

    for path in command_paths(&args.command) {
        if !settings.allows(path) {
            anyhow::bail!("Path not allowed: {}", path);
        }
    }

    let mut explorer = SshFileExplorer::new(settings.ssh_config(user, password), settings.staging_dir.clone());
    explorer.init()?;
    let result = execute(&explorer, &args.command);
    explorer.close()?;
    result
}

fn execute(explorer: &dyn FileExplorer, command: &Command) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Serve => {}
        Command::Ls { path } => {
            let entries = explorer.list_dir(path)?;
            serde_json::to_writer_pretty(&mut out, &entries)?;
            writeln!(out)?;
        }
        Command::Mv { path, new_path } => explorer.move_path(path, new_path)?,
        Command::Cp { path, new_path } => explorer.copy(path, new_path)?,
        Command::Rm { paths } => {
            for path in paths {
                explorer.delete(path)?;
            }
        }
        Command::Mkdir { path, name } => explorer.mkdir(path, name)?,
        Command::Chmod { perms_code, paths, recursive } => {
            for path in paths {
                explorer.chmod(path, perms_code, *recursive)?;
            }
        }
        Command::Cat { path } => {
            out.write_all(&explorer.read_file(path)?)?;
        }
        Command::Put { local, remote } => {
            let data = std::fs::read(local)?;
            explorer.save(remote, &data)?;
        }
    }
    Ok(())
}

fn command_paths(command: &Command) -> Vec<&str> {
    match command {
        Command::Serve => vec![],
        Command::Ls { path } | Command::Cat { path } | Command::Mkdir { path, .. } => vec![path.as_str()],
        Command::Mv { path, new_path } | Command::Cp { path, new_path } => vec![path.as_str(), new_path.as_str()],
        Command::Rm { paths } | Command::Chmod { paths, .. } => paths.iter().map(String::as_str).collect(),
        Command::Put { remote, .. } => vec![remote.as_str()],
    }
}
