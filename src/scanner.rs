use std::collections::VecDeque;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::StreamError;

/// Knobs controlling how the scanner treats the less regular corners of the
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScannerOptions {
    /// Treat `\"` inside a string as an escaped quote rather than the end of
    /// the string. Disabling this restores the older behaviour of toggling
    /// string state on every quote character.
    pub honor_escapes: bool,
    /// Keep `[` and `]` in the object text when they appear inside an object.
    /// By default they only move the depth counter and are dropped.
    pub retain_nested_brackets: bool,
    /// Upper bound, in bytes, for the object currently being accumulated.
    pub max_object_size: Option<usize>,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            honor_escapes: true,
            retain_nested_brackets: false,
            max_object_size: None,
        }
    }
}

/// Everything the scanner remembers between two fragments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScannerState {
    /// Open braces and brackets outside of string literals, the outer array
    /// included.
    pub depth: usize,
    pub in_string: bool,
    /// Text of the top-level object being scanned. Only meaningful while
    /// `depth >= 1`.
    pub current_object: String,
}

/// Completed object texts waiting to be handed out, oldest first.
#[derive(Debug, Default)]
pub struct ObjectQueue {
    ready: VecDeque<String>,
}

impl ObjectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: String) {
        self.ready.push_back(object);
    }

    pub fn pop(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    pub fn clear(&mut self) {
        self.ready.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    BeforeArray,
    InArray,
    AfterArray,
}

/// Character-level state machine that finds the boundaries of the objects
/// inside a top-level JSON array, one fragment at a time.
///
/// The scanner never looks past the character it is on, so a fragment may end
/// anywhere: inside a string, between a brace and its contents, or in the
/// middle of whitespace. Objects are pushed onto the [`ObjectQueue`] in the
/// order their closing brace is seen.
///
/// ```
/// use rest_array_stream::{BoundaryScanner, ObjectQueue};
///
/// let mut scanner = BoundaryScanner::new();
/// let mut queue = ObjectQueue::new();
/// scanner.process_fragment("[{\"a\":", &mut queue).unwrap();
/// assert!(queue.is_empty());
/// scanner.process_fragment("1}]", &mut queue).unwrap();
/// assert_eq!(queue.pop().as_deref(), Some("{\"a\":1}"));
/// ```
#[derive(Debug)]
pub struct BoundaryScanner {
    state: ScannerState,
    phase: Phase,
    escaped: bool,
    options: ScannerOptions,
}

impl Default for BoundaryScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryScanner {
    pub fn new() -> Self {
        Self::with_options(ScannerOptions::default())
    }

    pub fn with_options(options: ScannerOptions) -> Self {
        Self {
            state: ScannerState::default(),
            phase: Phase::BeforeArray,
            escaped: false,
            options,
        }
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    pub fn depth(&self) -> usize {
        self.state.depth
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Whether the closing `]` of the outer array has been seen.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::AfterArray
    }

    /// Feed one fragment. Objects closed by this fragment are appended to
    /// `queue`; a partially scanned object stays in the state.
    pub fn process_fragment(
        &mut self,
        fragment: &str,
        queue: &mut ObjectQueue,
    ) -> Result<(), StreamError> {
        trace!(
            len = fragment.len(),
            depth = self.state.depth,
            in_string = self.state.in_string,
            "scanning fragment"
        );
        for c in fragment.chars() {
            match self.phase {
                Phase::BeforeArray if is_whitespace(c) => {}
                Phase::BeforeArray if c == '[' => {
                    self.state.depth = 1;
                    self.phase = Phase::InArray;
                }
                Phase::InArray => self.scan_char(c, fragment, queue)?,
                Phase::AfterArray if is_whitespace(c) => {}
                Phase::BeforeArray | Phase::AfterArray => return Err(malformed(fragment)),
            }
        }
        Ok(())
    }

    /// Check the state once the source has no more fragments.
    pub fn finish(&self) -> Result<(), StreamError> {
        match self.phase {
            Phase::InArray => Err(StreamError::Truncated {
                depth: self.state.depth,
            }),
            Phase::BeforeArray | Phase::AfterArray => Ok(()),
        }
    }

    fn scan_char(
        &mut self,
        c: char,
        fragment: &str,
        queue: &mut ObjectQueue,
    ) -> Result<(), StreamError> {
        let state = &mut self.state;

        if state.in_string {
            state.current_object.push(c);
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' && self.options.honor_escapes {
                self.escaped = true;
            } else if c == '"' {
                state.in_string = false;
            }
            return self.check_size();
        }

        match c {
            '{' => {
                if state.depth == 1 {
                    state.current_object.clear();
                }
                state.depth += 1;
                state.current_object.push(c);
            }
            '"' => {
                state.in_string = true;
                state.current_object.push(c);
            }
            '}' => {
                // A close brace at array level has nothing to close.
                if state.depth < 2 {
                    return Err(malformed(fragment));
                }
                state.current_object.push(c);
                state.depth -= 1;
                if state.depth == 1 {
                    let object = std::mem::take(&mut state.current_object);
                    debug!(len = object.len(), "object complete");
                    queue.push(object);
                }
            }
            '[' => {
                if self.options.retain_nested_brackets && state.depth >= 2 {
                    state.current_object.push(c);
                }
                state.depth += 1;
            }
            ']' => {
                state.depth -= 1;
                if state.depth == 0 {
                    state.current_object.clear();
                    self.phase = Phase::AfterArray;
                } else if self.options.retain_nested_brackets && state.depth >= 2 {
                    state.current_object.push(c);
                }
            }
            c if is_whitespace(c) => {}
            c => state.current_object.push(c),
        }
        self.check_size()
    }

    fn check_size(&self) -> Result<(), StreamError> {
        match self.options.max_object_size {
            Some(limit) if self.state.current_object.len() > limit => {
                Err(StreamError::ObjectTooLarge { limit })
            }
            _ => Ok(()),
        }
    }
}

/// ASCII whitespace, vertical tab and form feed included.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn malformed(fragment: &str) -> StreamError {
    StreamError::Malformed {
        fragment: fragment.to_owned(),
    }
}
