use crate::config::CliConfig;
use crate::error::Result;
use colored::Colorize;
use serde_json::json;
use tracing::debug;
use xinde_api::{unix_now, TaskRequest, XindeClient};

fn build_client(base_url: Option<String>, app_id: &str, app_secret: &str) -> Result<XindeClient> {
    let config = CliConfig::load()?.client_config(base_url, app_id, app_secret)?;
    debug!(
        base_url = %config.base_url,
        timeout_secs = config.timeout_secs,
        "resolved client configuration"
    );
    Ok(XindeClient::new(config)?)
}

pub fn sign_url(url: &str, app_secret: &str, json_output: bool) -> Result<()> {
    let signed = xinde_sign::sign_url(url, app_secret)?;

    if json_output {
        let output = json!({
            "signed_url": signed.as_str(),
            "signature": signed.signature().as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("signed url: {signed}");
    }

    Ok(())
}

pub fn create_task_demo(
    base_url: Option<String>,
    app_id: &str,
    app_secret: &str,
    name: &str,
    id_number: &str,
    json_output: bool,
) -> Result<()> {
    let client = build_client(base_url, app_id, app_secret)?;
    let request = client.prepare_create_task(name, id_number, unix_now())?;
    send_and_print(&client, request, json_output)
}

pub fn get_task_status(
    base_url: Option<String>,
    task_id: &str,
    app_id: &str,
    app_secret: &str,
    json_output: bool,
) -> Result<()> {
    let client = build_client(base_url, app_id, app_secret)?;
    let request = client.prepare_task_status(task_id, unix_now())?;
    send_and_print(&client, request, json_output)
}

// The request is shown before it is sent so it is visible when the connection fails
fn send_and_print(client: &XindeClient, request: TaskRequest, json_output: bool) -> Result<()> {
    if !json_output {
        println!("signed url: {}", request.signed_url);
        if let Some(body) = &request.body {
            println!("{} body: {body}", request.method);
        }
    }

    let response = client.send(request)?;

    if json_output {
        let output = json!({
            "signed_url": response.signed_url.as_str(),
            "request_body": response.request_body,
            "status": response.status.as_u16(),
            "success": response.is_success(),
            "body": response.body,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let status = response.status.to_string();
    let status = if response.is_success() {
        status.as_str().green()
    } else {
        status.as_str().yellow()
    };
    println!("HTTP status: {status}");
    println!("response content: {}", response.body);

    Ok(())
}
