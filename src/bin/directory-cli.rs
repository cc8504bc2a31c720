use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "directory-cli")]
#[command(about = "Command-line client for the employee directory", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Search an organization's employees
    Search {
        /// Organization identifier (sent as X-Org-Id)
        org: String,
        #[command(flatten)]
        filters: Filters,
        /// Comma-separated output columns
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 20)]
        page_size: i64,
        #[arg(long, default_value = "id")]
        sort_by: String,
        #[arg(long, default_value = "asc")]
        sort_order: String,
    },
    /// Add an employee to an organization
    Add {
        org: String,
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        location: String,
        /// Active, "Not Started" or Terminated
        #[arg(long, default_value = "Active")]
        status: String,
        /// Custom field as key=value; repeatable
        #[arg(long = "extra", value_parser = parse_extra)]
        extra: Vec<(String, String)>,
    },
}

#[derive(Args)]
struct Filters {
    #[arg(long)]
    firstname: Option<String>,
    #[arg(long)]
    lastname: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    status: Option<String>,
}

fn parse_extra(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Search { org, filters, columns, page, page_size, sort_by, sort_order } => {
            let mut body = Map::new();
            for (key, value) in [
                ("firstname", filters.firstname),
                ("lastname", filters.lastname),
                ("contact", filters.contact),
                ("department", filters.department),
                ("position", filters.position),
                ("location", filters.location),
                ("status", filters.status),
            ] {
                if let Some(value) = value {
                    body.insert(key.to_string(), Value::String(value));
                }
            }
            if !columns.is_empty() {
                body.insert("columns".to_string(), Value::from(columns));
            }

            let res = client
                .post(format!("{}/search", cli.url))
                .header("X-Org-Id", org)
                .query(&[
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                    ("sort_by", sort_by),
                    ("sort_order", sort_order),
                ])
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Add { org, firstname, lastname, contact, department, position, location, status, extra } => {
            let extra: Map<String, Value> = extra
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            let body = serde_json::json!({
                "firstname": firstname,
                "lastname": lastname,
                "contact": contact,
                "department": department,
                "position": position,
                "location": location,
                "status": status,
                "extra": extra,
            });

            let res = client
                .post(format!("{}/employees", cli.url))
                .header("X-Org-Id", org)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(text);
        return Err(format!("directory returned status {}: {}", status, detail).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra() {
        assert_eq!(parse_extra("badge=B-7"), Ok(("badge".into(), "B-7".into())));
        assert_eq!(parse_extra("note=a=b"), Ok(("note".into(), "a=b".into())));
        assert!(parse_extra("novalue").is_err());
        assert!(parse_extra("=x").is_err());
    }

    #[tokio::test]
    async fn test_error_status_fails_the_command() {
        let res = axum::http::Response::builder()
            .status(429)
            .body(r#"{"detail":"Rate limit exceeded"}"#)
            .unwrap();
        let err = print_response(reqwest::Response::from(res)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "directory returned status 429 Too Many Requests: Rate limit exceeded"
        );
    }

    #[tokio::test]
    async fn test_success_status_prints() {
        let res = axum::http::Response::builder()
            .status(200)
            .body(r#"{"status":"ok"}"#)
            .unwrap();
        assert!(print_response(reqwest::Response::from(res)).await.is_ok());
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "directory-cli", "search", "org_a", "--firstname", "John", "--columns", "id,lastname",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { org, filters, columns, page, .. } => {
                assert_eq!(org, "org_a");
                assert_eq!(filters.firstname.as_deref(), Some("John"));
                assert_eq!(columns, vec!["id", "lastname"]);
                assert_eq!(page, 1);
            }
            _ => panic!("expected search"),
        }
    }
}
