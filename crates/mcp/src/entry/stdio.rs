#![forbid(unsafe_code)]

use super::framing::{
    TransportMode, detect_mode_from_first_line, parse_request, read_content_length_frame,
    write_frame,
};
use crate::McpServer;
use std::io::{BufRead, BufReader, Write};

/// Serves requests until stdin closes. Framing is detected once, from the first
/// non-empty line, and used for every response.
pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        if mode.is_none() {
            mode = detect_mode_from_first_line(&line);
        }
        let Some(active) = mode else {
            continue;
        };

        let body = match active {
            TransportMode::NewlineJson => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                raw.as_bytes().to_vec()
            }
            TransportMode::ContentLength => {
                if line.trim().is_empty() {
                    continue;
                }
                match read_content_length_frame(&mut reader, line)? {
                    Some(body) => body,
                    None => break,
                }
            }
        };

        handle_body(server, &mut stdout, active, &body)?;
    }

    tracing::debug!("stdin closed");
    Ok(())
}

fn handle_body<W: Write>(
    server: &mut McpServer,
    out: &mut W,
    mode: TransportMode,
    body: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let request = match parse_request(body) {
        Ok(request) => request,
        Err(resp) => {
            tracing::debug!("rejected malformed request");
            return write_frame(out, mode, &resp);
        }
    };
    if let Some(resp) = server.handle(request) {
        write_frame(out, mode, &resp)?;
    }
    Ok(())
}
