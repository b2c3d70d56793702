//! URL printing handlers

use super::AppContext;
use crate::cli::{ImageUrlArgs, OutputFormat, UrlArgs, WebUrlArgs};
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct UrlOutput<'a> {
    host: &'a str,
    dialect: String,
    url: &'a str,
}

/// Handle the url command
pub fn handle_url(args: UrlArgs, ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let host = ctx.resolve_host(args.host)?;
    let url = ctx.client.build_url(&host, &args.path);
    write_url(ctx, output, &host, &url)
}

/// Handle the image-url command
pub fn handle_image_url(
    args: ImageUrlArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let host = ctx.resolve_host(args.host)?;
    let url = ctx.client.build_image_url(&host, args.id);
    write_url(ctx, output, &host, &url)
}

/// Handle the web-url command
pub fn handle_web_url(args: WebUrlArgs, ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let host = ctx.resolve_host(args.host)?;
    let url = ctx.client.web_application_url(&host, &args.path);
    write_url(ctx, output, &host, &url)
}

fn write_url(ctx: &AppContext, output: &mut OutputWriter, host: &str, url: &str) -> Result<()> {
    match output.format() {
        OutputFormat::Human => output.writeln(url),
        _ => output.data(&UrlOutput {
            host,
            dialect: ctx.client.dialect_state().get().to_string(),
            url,
        }),
    }
}
