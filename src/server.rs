//! Blocking HTTP front end for the dashboard.
//!
//! `tiny_http` blocks on `recv`, so callers run [`serve`] inside
//! `spawn_blocking`. Requests are answered one at a time from the loaded table.

use log::{debug, error, info, warn};
use polars::prelude::DataFrame;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::error::{DashboardError, Result};
use crate::export::{to_csv_bytes, EXPORT_FILE_NAME, EXPORT_MIME};
use crate::menu::Selection;
use crate::pages::{render_selection, DOWNLOAD_PATH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Page(Selection),
    Download,
    NotFound,
}

/// Decodes one form-encoded query value (`+` is a space).
pub fn decode_query_value(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

pub fn route(method: &Method, url: &str) -> Route {
    if *method != Method::Get && *method != Method::Head {
        return Route::NotFound;
    }
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    match path {
        "/" => {
            let option = query.and_then(|q| {
                q.split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .find(|(key, _)| *key == "option")
                    .map(|(_, value)| decode_query_value(value))
            });
            Route::Page(Selection::from_query(option.as_deref()))
        }
        DOWNLOAD_PATH => Route::Download,
        _ => Route::NotFound,
    }
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| DashboardError::Header { name: name.to_string() })
}

fn html(body: String, status: u16) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
    Ok(Response::from_string(body)
        .with_status_code(status)
        .with_header(header("Content-Type", "text/html; charset=utf-8")?))
}

fn respond_to(df: &DataFrame, route: &Route) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
    match route {
        Route::Page(selection) => match render_selection(df, selection) {
            Ok(page) => html(page.to_html(), 200),
            Err(err) => {
                error!("failed to render {selection:?}: {err}");
                html(format!("<h1>Render failed</h1><p>{}</p>", crate::charts::escape(&err.to_string())), 500)
            }
        },
        Route::Download => {
            let bytes = to_csv_bytes(df)?;
            info!("serving export of {} rows", df.height());
            Ok(Response::from_data(bytes)
                .with_header(header("Content-Type", EXPORT_MIME)?)
                .with_header(header(
                    "Content-Disposition",
                    &format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                )?))
        }
        Route::NotFound => html("<h1>Not found</h1>".to_string(), 404),
    }
}

fn handle(df: &DataFrame, request: Request) {
    let route = route(request.method(), request.url());
    debug!("{} {} -> {:?}", request.method(), request.url(), route);

    let response = match respond_to(df, &route) {
        Ok(response) => response,
        Err(err) => {
            error!("request for {} failed: {err}", request.url());
            Response::from_string(err.to_string()).with_status_code(500)
        }
    };
    if let Err(err) = request.respond(response) {
        warn!("failed to send response: {err}");
    }
}

pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| DashboardError::Bind { addr: addr.to_string(), message: e.to_string() })
}

/// Answers requests until the server is unblocked or the process exits.
pub fn serve(server: Server, df: DataFrame) {
    match server.server_addr().to_ip() {
        Some(addr) => info!("dashboard listening on http://{addr}"),
        None => info!("dashboard listening"),
    }
    for request in server.incoming_requests() {
        handle(&df, request);
    }
}
