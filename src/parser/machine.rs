use std::borrow::Cow;

use super::{
    is_windows_drive_letter_string, starts_with_windows_drive_letter, State,
};
use crate::character_sets::{is_c0_control_or_space, is_url_code_point};
use crate::error::{ParseError, Result};
use crate::helpers;
use crate::host::{parse_host, Host};
use crate::record::UrlRecord;
use crate::scheme::{default_port, is_special_scheme};
use crate::unicode::percent_encode::{
    percent_encode_bytes_into, utf8_percent_encode_char_into, C0_CONTROL_SET, FRAGMENT_SET,
    PATH_SET, QUERY_SET, SPECIAL_QUERY_SET, USERINFO_SET,
};
use crate::validation::Reporter;

/// Outcome of one state step.
enum Flow {
    /// Keep stepping; the pointer advances afterwards
    Continue,
    /// Stop and yield the record (EOF handling and override early exits)
    Terminate,
}

/// Only the UTF-8 encoder ships. The legacy labels that would select a
/// UTF-16 or replacement encoder are demoted to UTF-8 by the standard, and
/// every other label would need an encoding back-end this crate does not
/// carry, so the answer is always "utf-8".
fn encoding_from_label(label: Option<&str>) -> &'static str {
    let Some(label) = label else { return "utf-8" };
    let label = label.trim();
    if label.eq_ignore_ascii_case("replacement")
        || label.eq_ignore_ascii_case("utf-16be")
        || label.eq_ignore_ascii_case("utf-16le")
    {
        return "utf-8";
    }
    "utf-8"
}

fn is_single_dot_segment(buffer: &str) -> bool {
    buffer == "." || buffer.eq_ignore_ascii_case("%2e")
}

fn is_double_dot_segment(buffer: &str) -> bool {
    buffer == ".."
        || buffer.eq_ignore_ascii_case(".%2e")
        || buffer.eq_ignore_ascii_case("%2e.")
        || buffer.eq_ignore_ascii_case("%2e%2e")
}

/// Set the second code point of a drive-letter buffer to ':', keeping the
/// rest intact.
fn normalize_drive_letter(buffer: &mut String) {
    let mut chars = buffer.chars();
    if let (Some(first), Some(_)) = (chars.next(), chars.next()) {
        let rest: String = chars.collect();
        *buffer = format!("{first}:{rest}");
    }
}

pub(crate) fn run(
    input: &str,
    base: Option<&UrlRecord>,
    url: Option<UrlRecord>,
    state_override: Option<State>,
    encoding_override: Option<&str>,
    reporter: Reporter<'_>,
) -> Result<UrlRecord> {
    let record_supplied = url.is_some();
    let url = url.unwrap_or_default();

    // A fresh record gets its input trimmed of C0 controls and spaces; a
    // caller-supplied record (state overrides) does not.
    let trimmed = if record_supplied {
        input
    } else {
        let trimmed = input.trim_matches(|c: char| is_c0_control_or_space(c));
        if trimmed.len() != input.len() {
            reporter.report("leading or trailing C0 control or space in input");
        }
        trimmed
    };

    // Tabs and newlines are stripped anywhere in the input.
    let cleaned: Cow<'_, str> = if helpers::has_tabs_or_newline(trimmed) {
        reporter.report("tab or newline in input");
        Cow::Owned(helpers::remove_tabs_and_newlines(trimmed))
    } else {
        Cow::Borrowed(trimmed)
    };

    let machine = StateMachine {
        input: cleaned.chars().collect(),
        base,
        url,
        state: state_override.unwrap_or(State::SchemeStart),
        state_override,
        encoding: encoding_from_label(encoding_override),
        buffer: String::new(),
        at_sign_seen: false,
        inside_brackets: false,
        password_token_seen: false,
        pointer: 0,
        reporter,
    };
    machine.run()
}

struct StateMachine<'a> {
    input: Vec<char>,
    base: Option<&'a UrlRecord>,
    url: UrlRecord,
    state: State,
    state_override: Option<State>,
    encoding: &'static str,
    buffer: String,
    at_sign_seen: bool,
    inside_brackets: bool,
    password_token_seen: bool,
    /// Signed like the standard's pointer: states decrement it to re-consume
    /// the current code point in their successor state.
    pointer: isize,
    reporter: Reporter<'a>,
}

impl StateMachine<'_> {
    fn run(mut self) -> Result<UrlRecord> {
        // One extra step runs at EOF (c is None) before the loop ends.
        while self.pointer <= self.input.len() as isize {
            let c = self.current();
            match self.step(c)? {
                Flow::Continue => self.pointer += 1,
                Flow::Terminate => break,
            }
        }
        Ok(self.url)
    }

    fn current(&self) -> Option<char> {
        usize::try_from(self.pointer)
            .ok()
            .and_then(|index| self.input.get(index).copied())
    }

    /// The input after the current code point.
    fn remaining_starts_with(&self, prefix: &str) -> bool {
        let Ok(start) = usize::try_from(self.pointer + 1) else {
            return false;
        };
        let mut index = start;
        for expected in prefix.chars() {
            match self.input.get(index) {
                Some(&c) if c == expected => index += 1,
                _ => return false,
            }
        }
        true
    }

    /// Whether the two code points after the current one are ASCII hex digits.
    fn remaining_starts_with_two_hex(&self) -> bool {
        let Ok(start) = usize::try_from(self.pointer + 1) else {
            return false;
        };
        matches!(
            (self.input.get(start), self.input.get(start + 1)),
            (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
        )
    }

    fn step(&mut self, c: Option<char>) -> Result<Flow> {
        match self.state {
            State::SchemeStart => self.scheme_start_state(c),
            State::Scheme => self.scheme_state(c),
            State::NoScheme => self.no_scheme_state(c),
            State::SpecialRelativeOrAuthority => self.special_relative_or_authority_state(c),
            State::PathOrAuthority => self.path_or_authority_state(c),
            State::Relative => self.relative_state(c),
            State::RelativeSlash => self.relative_slash_state(c),
            State::SpecialAuthoritySlashes => self.special_authority_slashes_state(c),
            State::SpecialAuthorityIgnoreSlashes => self.special_authority_ignore_slashes_state(c),
            State::Authority => self.authority_state(c),
            State::Host | State::Hostname => self.host_state(c),
            State::Port => self.port_state(c),
            State::File => self.file_state(c),
            State::FileSlash => self.file_slash_state(c),
            State::FileHost => self.file_host_state(c),
            State::PathStart => self.path_start_state(c),
            State::Path => self.path_state(c),
            State::CannotBeABaseUrlPath => self.cannot_be_a_base_url_path_state(c),
            State::Query => self.query_state(c),
            State::Fragment => self.fragment_state(c),
        }
    }

    fn scheme_start_state(&mut self, c: Option<char>) -> Result<Flow> {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.buffer.push(c.to_ascii_lowercase());
                self.state = State::Scheme;
            }
            _ if self.state_override.is_none() => {
                self.state = State::NoScheme;
                self.pointer -= 1;
            }
            _ => {
                self.reporter.report("scheme must start with an ASCII alpha");
                return Err(ParseError::InvalidScheme);
            }
        }
        Ok(Flow::Continue)
    }

    fn scheme_state(&mut self, c: Option<char>) -> Result<Flow> {
        match c {
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {
                self.buffer.push(c.to_ascii_lowercase());
            }
            Some(':') => {
                if self.state_override.is_some() {
                    // A scheme change must not cross the special/non-special
                    // boundary, must not give credentials or a port to file,
                    // and must not take file away from an empty host.
                    if self.url.is_special() != is_special_scheme(&self.buffer) {
                        return Ok(Flow::Terminate);
                    }
                    if self.buffer == "file"
                        && (self.url.includes_credentials() || self.url.port.is_some())
                    {
                        return Ok(Flow::Terminate);
                    }
                    if self.url.scheme == "file"
                        && matches!(self.url.host, None | Some(Host::Empty))
                    {
                        return Ok(Flow::Terminate);
                    }
                }
                self.url.scheme = std::mem::take(&mut self.buffer);
                if self.state_override.is_some() {
                    if self.url.port == default_port(&self.url.scheme) {
                        self.url.port = None;
                    }
                    return Ok(Flow::Terminate);
                }
                if self.url.scheme == "file" {
                    if !self.remaining_starts_with("//") {
                        self.reporter.report("file scheme is not followed by '//'");
                    }
                    self.state = State::File;
                } else if self.url.is_special()
                    && self.base.is_some_and(|base| base.scheme == self.url.scheme)
                {
                    self.state = State::SpecialRelativeOrAuthority;
                } else if self.url.is_special() {
                    self.state = State::SpecialAuthoritySlashes;
                } else if self.remaining_starts_with("/") {
                    self.state = State::PathOrAuthority;
                    self.pointer += 1;
                } else {
                    self.url.cannot_be_a_base_url = true;
                    self.url.path.push(String::new());
                    self.state = State::CannotBeABaseUrlPath;
                }
            }
            _ if self.state_override.is_none() => {
                self.buffer.clear();
                self.state = State::NoScheme;
                // Restart from the very first code point
                self.pointer = -1;
            }
            _ => {
                self.reporter.report("invalid code point in scheme");
                return Err(ParseError::InvalidScheme);
            }
        }
        Ok(Flow::Continue)
    }

    fn no_scheme_state(&mut self, c: Option<char>) -> Result<Flow> {
        let Some(base) = self.base else {
            self.reporter.report("relative URL with no base URL");
            return Err(ParseError::RelativeUrlWithoutBase);
        };
        if base.cannot_be_a_base_url && c != Some('#') {
            self.reporter
                .report("base URL cannot be a base and input is not a fragment");
            return Err(ParseError::InvalidUrl);
        }
        if base.cannot_be_a_base_url {
            // Fragment-only reference against an opaque-path base
            self.url.scheme = base.scheme.clone();
            self.url.path = base.path.clone();
            self.url.query = base.query.clone();
            self.url.fragment = Some(String::new());
            self.url.cannot_be_a_base_url = true;
            self.state = State::Fragment;
        } else if base.scheme != "file" {
            self.state = State::Relative;
            self.pointer -= 1;
        } else {
            self.state = State::File;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn special_relative_or_authority_state(&mut self, c: Option<char>) -> Result<Flow> {
        if c == Some('/') && self.remaining_starts_with("/") {
            self.state = State::SpecialAuthorityIgnoreSlashes;
            self.pointer += 1;
        } else {
            self.reporter.report("expected '//' after the scheme");
            self.state = State::Relative;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn path_or_authority_state(&mut self, c: Option<char>) -> Result<Flow> {
        if c == Some('/') {
            self.state = State::Authority;
        } else {
            self.state = State::Path;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn relative_state(&mut self, c: Option<char>) -> Result<Flow> {
        let base = self.base.ok_or(ParseError::RelativeUrlWithoutBase)?;
        self.url.scheme = base.scheme.clone();
        match c {
            None => {
                self.url.username = base.username.clone();
                self.url.password = base.password.clone();
                self.url.host = base.host.clone();
                self.url.port = base.port;
                self.url.path = base.path.clone();
                self.url.query = base.query.clone();
            }
            Some('/') => self.state = State::RelativeSlash,
            Some('?') => {
                self.url.username = base.username.clone();
                self.url.password = base.password.clone();
                self.url.host = base.host.clone();
                self.url.port = base.port;
                self.url.path = base.path.clone();
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.username = base.username.clone();
                self.url.password = base.password.clone();
                self.url.host = base.host.clone();
                self.url.port = base.port;
                self.url.path = base.path.clone();
                self.url.query = base.query.clone();
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some('\\') if self.url.is_special() => {
                self.reporter
                    .report("backslash treated as a slash in a special URL");
                self.state = State::RelativeSlash;
            }
            Some(_) => {
                self.url.username = base.username.clone();
                self.url.password = base.password.clone();
                self.url.host = base.host.clone();
                self.url.port = base.port;
                self.url.path = base.path.clone();
                self.url.path.pop();
                self.state = State::Path;
                self.pointer -= 1;
            }
        }
        Ok(Flow::Continue)
    }

    fn relative_slash_state(&mut self, c: Option<char>) -> Result<Flow> {
        if self.url.is_special() && matches!(c, Some('/') | Some('\\')) {
            if c == Some('\\') {
                self.reporter
                    .report("backslash treated as a slash in a special URL");
            }
            self.state = State::SpecialAuthorityIgnoreSlashes;
        } else if c == Some('/') {
            self.state = State::Authority;
        } else {
            let base = self.base.ok_or(ParseError::RelativeUrlWithoutBase)?;
            self.url.username = base.username.clone();
            self.url.password = base.password.clone();
            self.url.host = base.host.clone();
            self.url.port = base.port;
            self.state = State::Path;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn special_authority_slashes_state(&mut self, c: Option<char>) -> Result<Flow> {
        if c == Some('/') && self.remaining_starts_with("/") {
            self.state = State::SpecialAuthorityIgnoreSlashes;
            self.pointer += 1;
        } else {
            self.reporter.report("expected '//' before the authority");
            self.state = State::SpecialAuthorityIgnoreSlashes;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn special_authority_ignore_slashes_state(&mut self, c: Option<char>) -> Result<Flow> {
        if matches!(c, Some('/') | Some('\\')) {
            self.reporter.report("extra slash before the authority");
        } else {
            self.state = State::Authority;
            self.pointer -= 1;
        }
        Ok(Flow::Continue)
    }

    fn authority_state(&mut self, c: Option<char>) -> Result<Flow> {
        match c {
            Some('@') => {
                self.reporter.report("'@' in authority");
                if self.at_sign_seen {
                    // Everything before this '@' belongs to the userinfo of
                    // the previous one.
                    self.buffer.insert_str(0, "%40");
                }
                self.at_sign_seen = true;
                let buffer = std::mem::take(&mut self.buffer);
                for code_point in buffer.chars() {
                    if code_point == ':' && !self.password_token_seen {
                        self.password_token_seen = true;
                        continue;
                    }
                    if self.password_token_seen {
                        utf8_percent_encode_char_into(
                            &mut self.url.password,
                            code_point,
                            USERINFO_SET,
                        );
                    } else {
                        utf8_percent_encode_char_into(
                            &mut self.url.username,
                            code_point,
                            USERINFO_SET,
                        );
                    }
                }
            }
            None | Some('/') | Some('?') | Some('#') => return self.end_of_authority(),
            Some('\\') if self.url.is_special() => return self.end_of_authority(),
            Some(c) => self.buffer.push(c),
        }
        Ok(Flow::Continue)
    }

    fn end_of_authority(&mut self) -> Result<Flow> {
        if self.at_sign_seen && self.buffer.is_empty() {
            self.reporter.report("credentials with an empty host");
            return Err(ParseError::InvalidHost);
        }
        // Rewind to the start of the host and reparse it in the host state
        self.pointer -= self.buffer.chars().count() as isize + 1;
        self.buffer.clear();
        self.state = State::Host;
        Ok(Flow::Continue)
    }

    fn host_state(&mut self, c: Option<char>) -> Result<Flow> {
        if self.state_override.is_some() && self.url.scheme == "file" {
            self.pointer -= 1;
            self.state = State::FileHost;
            return Ok(Flow::Continue);
        }
        match c {
            Some(':') if !self.inside_brackets => {
                if self.buffer.is_empty() {
                    self.reporter.report("host is missing before ':'");
                    return Err(ParseError::InvalidHost);
                }
                let host = parse_host(&self.buffer, !self.url.is_special(), &self.reporter)?;
                self.url.host = Some(host);
                self.buffer.clear();
                self.state = State::Port;
                // The hostname setter stops here; the port is not its business
                if self.state_override == Some(State::Hostname) {
                    return Ok(Flow::Terminate);
                }
            }
            Some('\\') if self.url.is_special() => return self.finish_host(),
            None | Some('/') | Some('?') | Some('#') => return self.finish_host(),
            Some(c) => {
                if c == '[' {
                    self.inside_brackets = true;
                } else if c == ']' {
                    self.inside_brackets = false;
                }
                self.buffer.push(c);
            }
        }
        Ok(Flow::Continue)
    }

    fn finish_host(&mut self) -> Result<Flow> {
        self.pointer -= 1;
        if self.url.is_special() && self.buffer.is_empty() {
            self.reporter.report("special URL with an empty host");
            return Err(ParseError::InvalidHost);
        }
        if self.state_override.is_some()
            && self.buffer.is_empty()
            && (self.url.includes_credentials() || self.url.port.is_some())
        {
            self.reporter
                .report("cannot clear the host of a URL with credentials or a port");
            return Ok(Flow::Terminate);
        }
        let host = parse_host(&self.buffer, !self.url.is_special(), &self.reporter)?;
        self.url.host = Some(host);
        self.buffer.clear();
        self.state = State::PathStart;
        if self.state_override.is_some() {
            return Ok(Flow::Terminate);
        }
        Ok(Flow::Continue)
    }

    fn port_state(&mut self, c: Option<char>) -> Result<Flow> {
        match c {
            Some(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                Ok(Flow::Continue)
            }
            None | Some('/') | Some('?') | Some('#') => self.finish_port(),
            Some('\\') if self.url.is_special() => self.finish_port(),
            _ if self.state_override.is_some() => self.finish_port(),
            _ => {
                self.reporter.report("invalid code point in port");
                Err(ParseError::InvalidPort)
            }
        }
    }

    fn finish_port(&mut self) -> Result<Flow> {
        if !self.buffer.is_empty() {
            let port = match self.buffer.parse::<u32>() {
                Ok(port) if port <= u32::from(u16::MAX) => port as u16,
                _ => {
                    self.reporter.report("port exceeds 65535");
                    return Err(ParseError::InvalidPort);
                }
            };
            self.url.port = if Some(port) == default_port(&self.url.scheme) {
                None
            } else {
                Some(port)
            };
            self.buffer.clear();
        }
        if self.state_override.is_some() {
            return Ok(Flow::Terminate);
        }
        self.state = State::PathStart;
        self.pointer -= 1;
        Ok(Flow::Continue)
    }

    fn file_state(&mut self, c: Option<char>) -> Result<Flow> {
        self.url.scheme = "file".to_string();
        if matches!(c, Some('/') | Some('\\')) {
            if c == Some('\\') {
                self.reporter.report("backslash after the file scheme");
            }
            self.state = State::FileSlash;
            return Ok(Flow::Continue);
        }
        let file_base = self.base.filter(|base| base.scheme == "file");
        let Some(base) = file_base else {
            self.state = State::Path;
            self.pointer -= 1;
            return Ok(Flow::Continue);
        };
        match c {
            None => {
                self.url.host = base.host.clone();
                self.url.path = base.path.clone();
                self.url.query = base.query.clone();
            }
            Some('?') => {
                self.url.host = base.host.clone();
                self.url.path = base.path.clone();
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.host = base.host.clone();
                self.url.path = base.path.clone();
                self.url.query = base.query.clone();
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(_) => {
                let pointer = self.pointer.max(0) as usize;
                if !starts_with_windows_drive_letter(&self.input, pointer) {
                    self.url.host = base.host.clone();
                    self.url.path = base.path.clone();
                    self.url.shorten_path();
                } else {
                    self.reporter
                        .report("Windows drive letter in a relative file URL");
                }
                self.state = State::Path;
                self.pointer -= 1;
            }
        }
        Ok(Flow::Continue)
    }

    fn file_slash_state(&mut self, c: Option<char>) -> Result<Flow> {
        if matches!(c, Some('/') | Some('\\')) {
            if c == Some('\\') {
                self.reporter.report("backslash in a file URL");
            }
            self.state = State::FileHost;
            return Ok(Flow::Continue);
        }
        if let Some(base) = self.base.filter(|base| base.scheme == "file") {
            // file URLs are drive-relative: keep the base's drive letter
            // unless it has none, in which case keep its host.
            match base.path.first() {
                Some(first) if super::is_normalized_windows_drive_letter(first) => {
                    self.url.path.push(first.clone());
                }
                _ => self.url.host = base.host.clone(),
            }
        }
        self.state = State::Path;
        self.pointer -= 1;
        Ok(Flow::Continue)
    }

    fn file_host_state(&mut self, c: Option<char>) -> Result<Flow> {
        match c {
            None | Some('/') | Some('\\') | Some('?') | Some('#') => {
                self.pointer -= 1;
                if self.state_override.is_none() && is_windows_drive_letter_string(&self.buffer) {
                    self.reporter.report("file host is a Windows drive letter");
                    // The buffer is kept: the path state treats it as the
                    // first path segment.
                    self.state = State::Path;
                } else if self.buffer.is_empty() {
                    self.url.host = Some(Host::Empty);
                    if self.state_override.is_some() {
                        return Ok(Flow::Terminate);
                    }
                    self.state = State::PathStart;
                } else {
                    let mut host = parse_host(&self.buffer, !self.url.is_special(), &self.reporter)?;
                    if matches!(&host, Host::Domain(domain) if domain == "localhost") {
                        host = Host::Empty;
                    }
                    self.url.host = Some(host);
                    if self.state_override.is_some() {
                        return Ok(Flow::Terminate);
                    }
                    self.buffer.clear();
                    self.state = State::PathStart;
                }
            }
            Some(c) => self.buffer.push(c),
        }
        Ok(Flow::Continue)
    }

    fn path_start_state(&mut self, c: Option<char>) -> Result<Flow> {
        if self.url.is_special() {
            if c == Some('\\') {
                self.reporter.report("backslash at the start of a path");
            }
            self.state = State::Path;
            if !matches!(c, Some('/') | Some('\\')) {
                self.pointer -= 1;
            }
        } else if self.state_override.is_none() && c == Some('?') {
            self.url.query = Some(String::new());
            self.state = State::Query;
        } else if self.state_override.is_none() && c == Some('#') {
            self.url.fragment = Some(String::new());
            self.state = State::Fragment;
        } else if c.is_some() {
            self.state = State::Path;
            if c != Some('/') {
                self.pointer -= 1;
            }
        }
        Ok(Flow::Continue)
    }

    fn path_state(&mut self, c: Option<char>) -> Result<Flow> {
        let at_terminator = c.is_none()
            || c == Some('/')
            || (self.url.is_special() && c == Some('\\'))
            || (self.state_override.is_none() && matches!(c, Some('?') | Some('#')));
        if !at_terminator {
            if let Some(c) = c {
                if !is_url_code_point(c) && c != '%' {
                    self.reporter.report("code point in path is not a URL code point");
                }
                if c == '%' && !self.remaining_starts_with_two_hex() {
                    self.reporter
                        .report("'%' in path is not followed by two hex digits");
                }
                utf8_percent_encode_char_into(&mut self.buffer, c, PATH_SET);
            }
            return Ok(Flow::Continue);
        }

        if self.url.is_special() && c == Some('\\') {
            self.reporter.report("backslash in the path of a special URL");
        }
        let segment_continues = c == Some('/') || (self.url.is_special() && c == Some('\\'));

        if is_double_dot_segment(&self.buffer) {
            self.url.shorten_path();
            if !segment_continues {
                self.url.path.push(String::new());
            }
        } else if is_single_dot_segment(&self.buffer) {
            if !segment_continues {
                self.url.path.push(String::new());
            }
        } else {
            if self.url.scheme == "file"
                && self.url.path.is_empty()
                && is_windows_drive_letter_string(&self.buffer)
            {
                if !matches!(self.url.host, None | Some(Host::Empty)) {
                    self.reporter
                        .report("file URL host replaced by a Windows drive letter");
                    self.url.host = Some(Host::Empty);
                }
                normalize_drive_letter(&mut self.buffer);
            }
            self.url.path.push(std::mem::take(&mut self.buffer));
        }
        self.buffer.clear();

        if self.url.scheme == "file" && matches!(c, None | Some('?') | Some('#')) {
            while self.url.path.len() > 1 && self.url.path[0].is_empty() {
                self.reporter
                    .report("empty leading path segment in a file URL");
                self.url.path.remove(0);
            }
        }
        if c == Some('?') {
            self.url.query = Some(String::new());
            self.state = State::Query;
        }
        if c == Some('#') {
            self.url.fragment = Some(String::new());
            self.state = State::Fragment;
        }
        Ok(Flow::Continue)
    }

    fn cannot_be_a_base_url_path_state(&mut self, c: Option<char>) -> Result<Flow> {
        match c {
            Some('?') => {
                self.url.query = Some(String::new());
                self.state = State::Query;
            }
            Some('#') => {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
            Some(c) => {
                if !is_url_code_point(c) && c != '%' {
                    self.reporter
                        .report("code point in opaque path is not a URL code point");
                }
                if c == '%' && !self.remaining_starts_with_two_hex() {
                    self.reporter
                        .report("'%' in opaque path is not followed by two hex digits");
                }
                if let Some(first) = self.url.path.first_mut() {
                    utf8_percent_encode_char_into(first, c, C0_CONTROL_SET);
                }
            }
            None => {}
        }
        Ok(Flow::Continue)
    }

    fn query_state(&mut self, c: Option<char>) -> Result<Flow> {
        if c.is_none() || (self.state_override.is_none() && c == Some('#')) {
            if !self.url.is_special() || self.url.scheme == "ws" || self.url.scheme == "wss" {
                self.encoding = "utf-8";
            }
            debug_assert_eq!(self.encoding, "utf-8");
            let set = if self.url.is_special() {
                SPECIAL_QUERY_SET
            } else {
                QUERY_SET
            };
            let buffer = std::mem::take(&mut self.buffer);
            let query = self.url.query.get_or_insert_with(String::new);
            percent_encode_bytes_into(query, buffer.as_bytes(), set);
            if c == Some('#') {
                self.url.fragment = Some(String::new());
                self.state = State::Fragment;
            }
        } else if let Some(c) = c {
            if !is_url_code_point(c) && c != '%' {
                self.reporter
                    .report("code point in query is not a URL code point");
            }
            if c == '%' && !self.remaining_starts_with_two_hex() {
                self.reporter
                    .report("'%' in query is not followed by two hex digits");
            }
            self.buffer.push(c);
        }
        Ok(Flow::Continue)
    }

    fn fragment_state(&mut self, c: Option<char>) -> Result<Flow> {
        if let Some(c) = c {
            if !is_url_code_point(c) && c != '%' {
                self.reporter
                    .report("code point in fragment is not a URL code point");
            }
            if c == '%' && !self.remaining_starts_with_two_hex() {
                self.reporter
                    .report("'%' in fragment is not followed by two hex digits");
            }
            let fragment = self.url.fragment.get_or_insert_with(String::new);
            utf8_percent_encode_char_into(fragment, c, FRAGMENT_SET);
        }
        Ok(Flow::Continue)
    }
}
