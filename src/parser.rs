//! The Basic URL Parser: a state machine that turns an input string (plus
//! an optional base URL) into a [`URL`](crate::url::URL).
//!
//! [Specification](https://url.spec.whatwg.org/#url-parsing)

use crate::error::{URLParseError, ValidationError, ValidationErrorHandler};
use crate::host::{self, Host};
use crate::path::Path;
use crate::percent_encode::{
    is_c0_percent_encode_set, is_fragment_percent_encode_set, is_path_percent_encode_set,
    is_query_percent_encode_set, is_special_query_percent_encode_set,
    is_userinfo_percent_encode_set, percent_encode_char,
};
use crate::url::{default_port_for_scheme, URL};
use crate::util;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum URLParserState {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StartOver {
    Yes,
    No,
}

pub(crate) struct URLParser<'a, H: ValidationErrorHandler> {
    pub(crate) url: URL,
    pub(crate) base: Option<&'a URL>,
    pub(crate) chars: Vec<char>,
    pub(crate) state: URLParserState,
    /// `isize`, not `usize`: a state can `go_back()` off the start of the
    /// input (e.g. scheme-start rejecting the very first code point), and
    /// the net effect after the driver loop's implicit `+= 1` must be "stay
    /// on the same code point under the new state", not "skip one ahead".
    pub(crate) ptr: isize,
    pub(crate) buffer: String,
    pub(crate) at_sign_seen: bool,
    pub(crate) inside_brackets: bool,
    pub(crate) password_token_seen: bool,
    pub(crate) state_override: Option<URLParserState>,
    pub(crate) handler: &'a mut H,
}

impl<'a, H: ValidationErrorHandler> URLParser<'a, H> {
    pub(crate) fn run(mut self) -> Result<URL, URLParseError> {
        loop {
            let start_over = self.step()?;

            if start_over == StartOver::Yes {
                self.ptr = 0;
                continue;
            }

            if self.ptr >= self.chars.len() as isize {
                break;
            }

            self.ptr += 1;
        }

        Ok(self.url)
    }

    #[inline]
    fn c(&self) -> Option<char> {
        usize::try_from(self.ptr)
            .ok()
            .and_then(|ptr| self.chars.get(ptr))
            .copied()
    }

    /// Whether the code points strictly after the pointer start with `pat`.
    fn remaining_starts_with(&self, pat: &str) -> bool {
        let Some(start) = usize::try_from(self.ptr + 1).ok() else {
            return false;
        };
        pat.chars()
            .enumerate()
            .all(|(i, expected)| self.chars.get(start + i) == Some(&expected))
    }

    /// The code points from the pointer (inclusive) to the end of input,
    /// collected into a `String`. The file/file-slash states' Windows-drive-
    /// letter check is defined over "pointer to the end of input", which
    /// includes the current code point (unlike [`Self::remaining_starts_with`],
    /// which looks strictly past it).
    fn remaining_from_pointer(&self) -> String {
        let Some(start) = usize::try_from(self.ptr).ok() else {
            return self.chars.iter().collect();
        };
        self.chars
            .get(start..)
            .map(|cs| cs.iter().collect())
            .unwrap_or_default()
    }

    #[inline]
    fn go_back(&mut self) {
        self.ptr -= 1;
    }

    #[inline]
    fn go_back_n(&mut self, n: usize) {
        self.ptr -= n as isize;
    }

    fn is_special(&self) -> bool {
        self.url.is_special()
    }

    fn step(&mut self) -> Result<StartOver, URLParseError> {
        match self.state {
            // https://url.spec.whatwg.org/#scheme-start-state
            URLParserState::SchemeStart => {
                match self.c() {
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.buffer.push(c.to_ascii_lowercase());
                        self.state = URLParserState::Scheme;
                    },
                    _ => {
                        self.state = URLParserState::NoScheme;
                        self.go_back();
                    },
                }
            },

            // https://url.spec.whatwg.org/#scheme-state
            URLParserState::Scheme => {
                match self.c() {
                    Some(c) if matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '+' | '-' | '.') => {
                        self.buffer.push(c.to_ascii_lowercase());
                    },
                    Some(':') => {
                        if self.state_override.is_some() {
                            let url_special = self.url.is_special();
                            let buffer_special = crate::url::is_special_scheme(&self.buffer);

                            if url_special && !buffer_special {
                                return Ok(StartOver::No);
                            }
                            if !url_special && buffer_special {
                                return Ok(StartOver::No);
                            }
                            if (self.url.includes_credentials() || self.url.port.is_some())
                                && self.buffer == "file"
                            {
                                return Ok(StartOver::No);
                            }
                            if self.url.scheme == "file"
                                && matches!(self.url.host, Some(Host::Empty))
                            {
                                return Ok(StartOver::No);
                            }
                        }

                        self.url.scheme = self.buffer.clone();

                        if self.state_override.is_some() {
                            if self.url.port == default_port_for_scheme(&self.url.scheme) {
                                self.url.port = None;
                            }
                            return Ok(StartOver::No);
                        }

                        self.buffer.clear();

                        if self.url.scheme == "file" {
                            if !self.remaining_starts_with("//") {
                                self.handler.validation_error(
                                    ValidationError::SpecialSchemeMissingFollowingSolidus,
                                );
                            }
                            self.state = URLParserState::File;
                        } else if self.url.is_special()
                            && self.base.is_some_and(|base| base.scheme == self.url.scheme)
                        {
                            self.state = URLParserState::SpecialRelativeOrAuthority;
                        } else if self.url.is_special() {
                            self.state = URLParserState::SpecialAuthoritySlashes;
                        } else if self.remaining_starts_with("/") {
                            self.state = URLParserState::PathOrAuthority;
                            self.ptr += 1;
                        } else {
                            self.url.path = Path::Opaque(String::new());
                            self.state = URLParserState::OpaquePath;
                        }
                    },
                    _ => {
                        if self.state_override.is_none() {
                            self.buffer.clear();
                            self.state = URLParserState::NoScheme;
                            return Ok(StartOver::Yes);
                        }

                        return Err(URLParseError::InvalidScheme);
                    },
                }
            },

            // https://url.spec.whatwg.org/#no-scheme-state
            URLParserState::NoScheme => {
                let base_is_usable =
                    self.base.is_some_and(|base| !base.path.is_opaque() || self.c() == Some('#'));

                if !base_is_usable {
                    self.handler
                        .validation_error(ValidationError::MissingSchemeNonRelativeURL);
                    return Err(URLParseError::InvalidScheme);
                }

                let base = self.base.expect("checked above");

                if base.path.is_opaque() && self.c() == Some('#') {
                    self.url.scheme = base.scheme.clone();
                    self.url.path = base.path.clone();
                    self.url.query = base.query.clone();
                    self.url.fragment = Some(String::new());
                    self.state = URLParserState::Fragment;
                } else if base.scheme != "file" {
                    self.state = URLParserState::Relative;
                    self.go_back();
                } else {
                    self.state = URLParserState::File;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#special-relative-or-authority-state
            URLParserState::SpecialRelativeOrAuthority => {
                if self.c() == Some('/') && self.remaining_starts_with("/") {
                    self.state = URLParserState::SpecialAuthorityIgnoreSlashes;
                    self.ptr += 1;
                } else {
                    self.handler
                        .validation_error(ValidationError::SpecialSchemeMissingFollowingSolidus);
                    self.state = URLParserState::Relative;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#path-or-authority-state
            URLParserState::PathOrAuthority => {
                if self.c() == Some('/') {
                    self.state = URLParserState::Authority;
                } else {
                    self.state = URLParserState::Path;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#relative-state
            URLParserState::Relative => {
                let base = self.base.expect("no-scheme state already checked this");
                debug_assert_ne!(base.scheme, "file");

                self.url.scheme = base.scheme.clone();

                if self.c() == Some('/') {
                    self.state = URLParserState::RelativeSlash;
                } else if self.is_special() && self.c() == Some('\\') {
                    self.handler
                        .validation_error(ValidationError::InvalidReverseSolidus);
                    self.state = URLParserState::RelativeSlash;
                } else {
                    self.url.username = base.username.clone();
                    self.url.password = base.password.clone();
                    self.url.host = base.host.clone();
                    self.url.port = base.port;
                    self.url.path = base.path.clone();
                    self.url.query = base.query.clone();

                    if self.c() == Some('?') {
                        self.url.query = Some(String::new());
                        self.state = URLParserState::Query;
                    } else if self.c() == Some('#') {
                        self.url.fragment = Some(String::new());
                        self.state = URLParserState::Fragment;
                    } else if self.c().is_some() {
                        self.url.query = None;
                        self.url.path.shorten(false);
                        self.state = URLParserState::Path;
                        self.go_back();
                    }
                }
            },

            // https://url.spec.whatwg.org/#relative-slash-state
            URLParserState::RelativeSlash => {
                if self.is_special() && matches!(self.c(), Some('/' | '\\')) {
                    if self.c() == Some('\\') {
                        self.handler
                            .validation_error(ValidationError::InvalidReverseSolidus);
                    }
                    self.state = URLParserState::SpecialAuthorityIgnoreSlashes;
                } else if self.c() == Some('/') {
                    self.state = URLParserState::Authority;
                } else {
                    let base = self.base.expect("relative state already checked this");
                    self.url.username = base.username.clone();
                    self.url.password = base.password.clone();
                    self.url.host = base.host.clone();
                    self.url.port = base.port;
                    self.state = URLParserState::Path;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#special-authority-slashes-state
            URLParserState::SpecialAuthoritySlashes => {
                if self.c() == Some('/') && self.remaining_starts_with("/") {
                    self.state = URLParserState::SpecialAuthorityIgnoreSlashes;
                    self.ptr += 1;
                } else {
                    self.handler
                        .validation_error(ValidationError::SpecialSchemeMissingFollowingSolidus);
                    self.state = URLParserState::SpecialAuthorityIgnoreSlashes;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#special-authority-ignore-slashes-state
            URLParserState::SpecialAuthorityIgnoreSlashes => {
                if !matches!(self.c(), Some('/' | '\\')) {
                    self.state = URLParserState::Authority;
                    self.go_back();
                } else {
                    self.handler
                        .validation_error(ValidationError::SpecialSchemeMissingFollowingSolidus);
                }
            },

            // https://url.spec.whatwg.org/#authority-state
            URLParserState::Authority => {
                if self.c() == Some('@') {
                    self.handler.validation_error(ValidationError::InvalidCredentials);

                    if self.at_sign_seen {
                        self.buffer.insert_str(0, "%40");
                    }
                    self.at_sign_seen = true;

                    for code_point in self.buffer.chars().collect::<Vec<_>>() {
                        if code_point == ':' && !self.password_token_seen {
                            self.password_token_seen = true;
                            continue;
                        }

                        let mut encoded = String::new();
                        percent_encode_char(code_point, is_userinfo_percent_encode_set, &mut encoded);

                        if self.password_token_seen {
                            self.url.password.push_str(&encoded);
                        } else {
                            self.url.username.push_str(&encoded);
                        }
                    }

                    self.buffer.clear();
                } else if (self.c().is_none() || matches!(self.c(), Some('/' | '?' | '#')))
                    || (self.is_special() && self.c() == Some('\\'))
                {
                    if self.at_sign_seen && self.buffer.is_empty() {
                        self.handler.validation_error(ValidationError::HostMissing);
                        return Err(URLParseError::InvalidHost(
                            crate::error::HostParseError::ForbiddenCodePoint,
                        ));
                    }

                    self.go_back_n(self.buffer.chars().count() + 1);
                    self.buffer.clear();
                    self.state = URLParserState::Host;
                } else {
                    self.buffer.push(self.c().expect("checked above"));
                }
            },

            // https://url.spec.whatwg.org/#host-state
            // https://url.spec.whatwg.org/#hostname-state
            URLParserState::Host | URLParserState::Hostname => {
                if self.state_override.is_some() && self.url.scheme == "file" {
                    self.go_back();
                    self.state = URLParserState::FileHost;
                } else if self.c() == Some(':') && !self.inside_brackets {
                    if self.buffer.is_empty() {
                        self.handler.validation_error(ValidationError::HostMissing);
                        return Err(URLParseError::InvalidHost(
                            crate::error::HostParseError::ForbiddenCodePoint,
                        ));
                    }

                    if matches!(self.state_override, Some(URLParserState::Hostname)) {
                        return Ok(StartOver::No);
                    }

                    let host = host::parse_host(&self.buffer, !self.is_special(), self.handler)?;
                    self.url.host = Some(host);
                    self.buffer.clear();
                    self.state = URLParserState::Port;
                } else if (self.c().is_none() || matches!(self.c(), Some('/' | '?' | '#')))
                    || (self.is_special() && self.c() == Some('\\'))
                {
                    self.go_back();

                    if self.is_special() && self.buffer.is_empty() {
                        self.handler.validation_error(ValidationError::HostMissing);
                        return Err(URLParseError::InvalidHost(
                            crate::error::HostParseError::ForbiddenCodePoint,
                        ));
                    }

                    if self.state_override.is_some()
                        && self.buffer.is_empty()
                        && (self.url.includes_credentials() || self.url.port.is_some())
                    {
                        return Ok(StartOver::No);
                    }

                    let host = host::parse_host(&self.buffer, !self.is_special(), self.handler)?;
                    self.url.host = Some(host);
                    self.buffer.clear();

                    if self.state_override.is_some() {
                        return Ok(StartOver::No);
                    }

                    self.state = URLParserState::PathStart;
                } else {
                    if self.c() == Some('[') {
                        self.inside_brackets = true;
                    } else if self.c() == Some(']') {
                        self.inside_brackets = false;
                    }
                    self.buffer.push(self.c().expect("checked above"));
                }
            },

            // https://url.spec.whatwg.org/#port-state
            URLParserState::Port => {
                if let Some(digit) = self.c().filter(char::is_ascii_digit) {
                    self.buffer.push(digit);
                } else if (self.c().is_none() || matches!(self.c(), Some('/' | '?' | '#')))
                    || (self.is_special() && self.c() == Some('\\'))
                    || self.state_override.is_some()
                {
                    if !self.buffer.is_empty() {
                        let port: u32 = self
                            .buffer
                            .parse()
                            .map_err(|_| URLParseError::InvalidPort)?;

                        if port > u32::from(u16::MAX) {
                            self.handler.validation_error(ValidationError::PortOutOfRange);
                            return Err(URLParseError::InvalidPort);
                        }

                        let port = port as u16;
                        if default_port_for_scheme(&self.url.scheme) == Some(port) {
                            self.url.port = None;
                        } else {
                            self.url.port = Some(port);
                        }

                        self.buffer.clear();
                    }

                    if self.state_override.is_some() {
                        return Ok(StartOver::No);
                    }

                    self.state = URLParserState::PathStart;
                    self.go_back();
                } else {
                    self.handler.validation_error(ValidationError::PortInvalid);
                    return Err(URLParseError::InvalidPort);
                }
            },

            // https://url.spec.whatwg.org/#file-state
            URLParserState::File => {
                self.url.scheme = "file".to_string();
                self.url.host = Some(Host::Empty);

                if matches!(self.c(), Some('/' | '\\')) {
                    if self.c() == Some('\\') {
                        self.handler
                            .validation_error(ValidationError::InvalidReverseSolidus);
                    }
                    self.state = URLParserState::FileSlash;
                } else if let Some(base) = self.base.filter(|base| base.scheme == "file") {
                    self.url.host = base.host.clone();
                    self.url.path = base.path.clone();
                    self.url.query = base.query.clone();

                    if self.c() == Some('?') {
                        self.url.query = Some(String::new());
                        self.state = URLParserState::Query;
                    } else if self.c() == Some('#') {
                        self.url.fragment = Some(String::new());
                        self.state = URLParserState::Fragment;
                    } else if self.c().is_some() {
                        self.url.query = None;

                        if !util::starts_with_windows_drive_letter(&self.remaining_from_pointer()) {
                            self.url.path.shorten(true);
                        } else {
                            self.handler
                                .validation_error(ValidationError::FileInvalidWindowsDriveLetter);
                            self.url.path = Path::List(Vec::new());
                        }

                        self.state = URLParserState::Path;
                        self.go_back();
                    }
                } else {
                    self.state = URLParserState::Path;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#file-slash-state
            URLParserState::FileSlash => {
                if matches!(self.c(), Some('/' | '\\')) {
                    if self.c() == Some('\\') {
                        self.handler
                            .validation_error(ValidationError::InvalidReverseSolidus);
                    }
                    self.state = URLParserState::FileHost;
                } else {
                    if let Some(base) = self.base.filter(|base| base.scheme == "file") {
                        self.url.host = base.host.clone();

                        let base_starts_with_drive_letter = base
                            .path
                            .segments()
                            .and_then(|segments| segments.first())
                            .is_some_and(|first| util::is_normalized_windows_drive_letter(first));

                        if !util::starts_with_windows_drive_letter(&self.remaining_from_pointer())
                            && base_starts_with_drive_letter
                        {
                            if let Some(first) =
                                base.path.segments().and_then(|segments| segments.first())
                            {
                                self.url.path.push(first.clone());
                            }
                        }
                    }

                    self.state = URLParserState::Path;
                    self.go_back();
                }
            },

            // https://url.spec.whatwg.org/#file-host-state
            URLParserState::FileHost => {
                if self.c().is_none() || matches!(self.c(), Some('/' | '\\' | '?' | '#')) {
                    self.go_back();

                    if !self.state_override.is_some() && util::is_windows_drive_letter(&self.buffer)
                    {
                        self.handler.validation_error(
                            ValidationError::FileInvalidWindowsDriveLetterHost,
                        );
                        self.state = URLParserState::Path;
                    } else if self.buffer.is_empty() {
                        self.url.host = Some(Host::Empty);

                        if self.state_override.is_some() {
                            return Ok(StartOver::No);
                        }

                        self.state = URLParserState::PathStart;
                    } else {
                        let mut host = host::parse_host(&self.buffer, true, self.handler)?;

                        if let Host::Domain(domain) = &host {
                            if domain == "localhost" {
                                host = Host::Empty;
                            }
                        }

                        self.url.host = Some(host);

                        if self.state_override.is_some() {
                            return Ok(StartOver::No);
                        }

                        self.buffer.clear();
                        self.state = URLParserState::PathStart;
                    }
                } else {
                    self.buffer.push(self.c().expect("checked above"));
                }
            },

            // https://url.spec.whatwg.org/#path-start-state
            URLParserState::PathStart => {
                if self.is_special() {
                    if self.c() == Some('\\') {
                        self.handler
                            .validation_error(ValidationError::InvalidReverseSolidus);
                    }
                    self.state = URLParserState::Path;

                    if !matches!(self.c(), Some('/' | '\\')) {
                        self.go_back();
                    }
                } else if self.state_override.is_none() && self.c() == Some('?') {
                    self.url.query = Some(String::new());
                    self.state = URLParserState::Query;
                } else if self.state_override.is_none() && self.c() == Some('#') {
                    self.url.fragment = Some(String::new());
                    self.state = URLParserState::Fragment;
                } else if self.c().is_some() {
                    self.state = URLParserState::Path;

                    if self.c() != Some('/') {
                        self.go_back();
                    }
                } else if self.state_override.is_some() && self.url.host.is_none() {
                    self.url.path.push(String::new());
                }
            },

            // https://url.spec.whatwg.org/#path-state
            URLParserState::Path => {
                let c = self.c();

                if (c.is_none() || matches!(c, Some('?' | '#' | '/')))
                    || (self.is_special() && c == Some('\\'))
                {
                    if self.is_special() && c == Some('\\') {
                        self.handler
                            .validation_error(ValidationError::InvalidReverseSolidus);
                    }

                    if util::is_double_dot_path_segment(&self.buffer) {
                        self.url.path.shorten(self.url.scheme == "file");

                        if c != Some('/') && !(self.is_special() && c == Some('\\')) {
                            self.url.path.push(String::new());
                        }
                    } else if util::is_single_dot_path_segment(&self.buffer) {
                        if c != Some('/') && !(self.is_special() && c == Some('\\')) {
                            self.url.path.push(String::new());
                        }
                    } else {
                        if self.url.scheme == "file"
                            && self.url.path.is_empty()
                            && util::is_windows_drive_letter(&self.buffer)
                        {
                            if let Some((pos, ch)) = self.buffer.char_indices().nth(1) {
                                let range = pos..pos + ch.len_utf8();
                                self.buffer.replace_range(range, ":");
                            }
                        }

                        self.url.path.push(std::mem::take(&mut self.buffer));
                    }

                    self.buffer.clear();

                    if c == Some('?') {
                        self.url.query = Some(String::new());
                        self.state = URLParserState::Query;
                    }
                    if c == Some('#') {
                        self.url.fragment = Some(String::new());
                        self.state = URLParserState::Fragment;
                    }
                } else {
                    if !util::is_url_codepoint(c.expect("checked above")) && c != Some('%') {
                        self.handler.validation_error(ValidationError::InvalidURLUnit);
                    }

                    percent_encode_char(
                        c.expect("checked above"),
                        is_path_percent_encode_set,
                        &mut self.buffer,
                    );
                }
            },

            // https://url.spec.whatwg.org/#cannot-be-a-base-url-path-state
            URLParserState::OpaquePath => {
                if self.c() == Some('?') {
                    self.url.query = Some(String::new());
                    self.state = URLParserState::Query;
                } else if self.c() == Some('#') {
                    self.url.fragment = Some(String::new());
                    self.state = URLParserState::Fragment;
                } else if let Some(c) = self.c() {
                    if let Path::Opaque(opaque) = &mut self.url.path {
                        percent_encode_char(c, is_c0_percent_encode_set, opaque);
                    }
                }
            },

            // https://url.spec.whatwg.org/#query-state
            URLParserState::Query => {
                if self.c() == Some('#') || self.c().is_none() {
                    let query_set = if self.is_special() {
                        is_special_query_percent_encode_set
                    } else {
                        is_query_percent_encode_set
                    };

                    let query = self.url.query.get_or_insert_with(String::new);
                    let buffer = std::mem::take(&mut self.buffer);
                    for c in buffer.chars() {
                        percent_encode_char(c, query_set, query);
                    }

                    if self.c() == Some('#') {
                        self.url.fragment = Some(String::new());
                        self.state = URLParserState::Fragment;
                    }
                } else if let Some(c) = self.c() {
                    if !util::is_url_codepoint(c) && c != '%' {
                        self.handler.validation_error(ValidationError::InvalidURLUnit);
                    }
                    self.buffer.push(c);
                }
            },

            // https://url.spec.whatwg.org/#fragment-state
            URLParserState::Fragment => {
                if let Some(c) = self.c() {
                    if !util::is_url_codepoint(c) && c != '%' {
                        self.handler.validation_error(ValidationError::InvalidURLUnit);
                    }

                    let fragment = self.url.fragment.get_or_insert_with(String::new);
                    percent_encode_char(c, is_fragment_percent_encode_set, fragment);
                }
            },
        }

        Ok(StartOver::No)
    }
}
