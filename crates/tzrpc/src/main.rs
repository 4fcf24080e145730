mod cli;

use bytes::Bytes;
use clap::Parser;
use eyre::{eyre, WrapErr};

use tzrpc_core::{BootstrapError, Client, RpcError};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let (client, bootstrap_error) = Client::with_config(&args.node, args.client_config())
        .await
        .into_parts();
    if let Some(err) = &bootstrap_error {
        tracing::warn!("{}", bootstrap_hint(err));
    }

    match args.command {
        Command::Head => {
            let head = client
                .head()
                .await
                .map_err(report_body)
                .wrap_err("fetch chain head")?;
            print_json(&head)?;
        }
        Command::Constants => {
            let Some(constants) = client.constants() else {
                let err = bootstrap_error
                    .map(eyre::Report::new)
                    .unwrap_or_else(|| eyre!("no network constants cached"));
                return Err(err.wrap_err(format!("load network constants from `{}`", args.node)));
            };
            print_json(constants.as_ref())?;
        }
        Command::Get { path, query } => {
            let body = client
                .get(&path, &query)
                .await
                .map_err(report_body)
                .wrap_err_with(|| format!("GET {path}"))?;
            print_body(&body);
        }
        Command::Post { path, data, query } => {
            let body = client
                .post(&path, data.into_bytes(), &query)
                .await
                .map_err(report_body)
                .wrap_err_with(|| format!("POST {path}"))?;
            print_body(&body);
        }
        Command::Delete { path, query } => {
            let body = client
                .delete(&path, &query)
                .await
                .map_err(report_body)
                .wrap_err_with(|| format!("DELETE {path}"))?;
            print_body(&body);
        }
    }

    Ok(())
}

/// Echo whatever the node sent to stderr before the error is reported, so a
/// failed call never hides the raw reply.
fn report_body(err: RpcError) -> RpcError {
    if let Some(body) = err.body().filter(|body| !body.is_empty()) {
        eprintln!("{}", String::from_utf8_lossy(body));
    }
    err
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> eyre::Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("render JSON")?;
    println!("{rendered}");
    Ok(())
}

/// Pretty-print JSON bodies; anything else is printed as text.
fn print_body(body: &Bytes) {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => println!("{rendered}"),
            Err(_) => println!("{}", String::from_utf8_lossy(body)),
        },
        Err(_) => println!("{}", String::from_utf8_lossy(body)),
    }
}

fn bootstrap_hint(err: &BootstrapError) -> String {
    let mut lines = vec![err.to_string()];
    let rpc_error = match err {
        BootstrapError::Transport(cause) => {
            lines.push(format!("cause: {cause}"));
            return lines.join("\n");
        }
        BootstrapError::Head(source) | BootstrapError::Constants { source, .. } => source,
    };
    lines.push(format!("cause: {rpc_error}"));

    match rpc_error {
        RpcError::Transport(_) => lines.push(
            "hint: node unreachable; verify --node and that the node's RPC server is enabled"
                .into(),
        ),
        RpcError::Request(_) => {
            lines.push("hint: --node is not a valid URL; expected host[:port] or http(s)://host".into())
        }
        RpcError::Status { status, .. } if status.as_u16() == 403 => lines.push(
            "hint: the node's RPC ACL denies this path; check the node's --allow-all-rpc setting"
                .into(),
        ),
        RpcError::Status { status, .. } if status.as_u16() == 404 => lines.push(
            "hint: endpoint not found; verify the node exposes the shell RPC under --node".into(),
        ),
        RpcError::Decode { .. } => lines.push(
            "hint: unexpected payload shape; the node may run an unsupported protocol".into(),
        ),
        _ => {}
    }

    lines.join("\n")
}
