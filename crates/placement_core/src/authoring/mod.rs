//! Anchor authoring protocol
//!
//! Collects a new anchor definition as a fixed sequence of typed prompts,
//! independent of how the answers are gathered (terminal, script, tests).
//!
//! ## Sequence
//! 1. anchor position → orientation → config type
//! 2. per item: position → orientation → config type → "add another?"
//!
//! Answers use the in-game debug readout format:
//! `Position: <x, y, z>`, `Orientation: <x, y, z>`, `Config-Type: name`.

use crate::error::{AuthoringError, PlacementError, Result};
use crate::models::{AnchorDefinition, ItemDefinition, Orientation, Pose, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    AnchorPosition,
    AnchorOrientation,
    AnchorType,
    ItemPosition(usize),
    ItemOrientation(usize),
    ItemType(usize),
    AddAnother(usize),
}

impl Prompt {
    /// Operator-facing question. Item numbers are 1-based.
    pub fn text(&self) -> String {
        match self {
            Prompt::AnchorPosition => {
                "Enter building position (format: Position: <x, y, z>): ".to_string()
            }
            Prompt::AnchorOrientation => {
                "Enter building orientation (format: Orientation: <x, y, z>): ".to_string()
            }
            Prompt::AnchorType => {
                "Enter building config type (format: Config-Type: name): ".to_string()
            }
            Prompt::ItemPosition(i) => format!(
                "Enter crate {} position (format: Position: <x, y, z>): ",
                i + 1
            ),
            Prompt::ItemOrientation(i) => format!(
                "Enter crate {} orientation (format: Orientation: <x, y, z>): ",
                i + 1
            ),
            Prompt::ItemType(i) => format!(
                "Enter crate {} config type (format: Config-Type: name): ",
                i + 1
            ),
            Prompt::AddAnother(_) => "Do you want to add another crate? (yes/no): ".to_string(),
        }
    }
}

/// A parsed operator answer
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Vector([f64; 3]),
    Name(String),
    Confirm(bool),
}

/// Extract `x, y, z` from between `<` and `>`.
pub fn parse_vector(line: &str) -> std::result::Result<[f64; 3], AuthoringError> {
    let inner = line
        .split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| AuthoringError::MissingVector(line.trim().to_string()))?;

    let values = inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AuthoringError::InvalidNumber(part.to_string()))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        other => Err(AuthoringError::ComponentCount(other.len())),
    }
}

/// Value after `Config-Type:`; a bare name is accepted as well.
pub fn parse_name(line: &str) -> std::result::Result<String, AuthoringError> {
    let name = match line.split_once(':') {
        Some((_, rest)) => rest.split(':').next().unwrap_or_default().trim(),
        None => line.trim(),
    };
    if name.is_empty() {
        return Err(AuthoringError::MissingName(line.trim().to_string()));
    }
    Ok(name.to_string())
}

/// Only `yes` (any case) continues.
pub fn parse_confirm(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("yes")
}

#[derive(Debug, Clone, Default)]
struct PendingItem {
    position: Option<Position>,
    orientation: Option<Orientation>,
}

/// Protocol state for one anchor definition
#[derive(Debug, Clone)]
pub struct AuthoringSession {
    prompt: Option<Prompt>,
    anchor_position: Option<Position>,
    anchor_orientation: Option<Orientation>,
    type_id: Option<String>,
    pending: PendingItem,
    items: Vec<ItemDefinition>,
}

impl Default for AuthoringSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthoringSession {
    pub fn new() -> Self {
        Self {
            prompt: Some(Prompt::AnchorPosition),
            anchor_position: None,
            anchor_orientation: None,
            type_id: None,
            pending: PendingItem::default(),
            items: Vec::new(),
        }
    }

    /// Current question, `None` once the definition is complete.
    pub fn next_prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn is_complete(&self) -> bool {
        self.prompt.is_none()
    }

    /// Feed the operator's line for the current prompt.
    ///
    /// On error the session is unchanged and the same prompt stays current.
    pub fn answer(&mut self, line: &str) -> std::result::Result<Answer, AuthoringError> {
        let prompt = self.prompt.ok_or(AuthoringError::Complete)?;

        let (answer, next) = match prompt {
            Prompt::AnchorPosition => {
                let v = parse_vector(line)?;
                self.anchor_position = Some(Position::from(v));
                (Answer::Vector(v), Prompt::AnchorOrientation)
            }
            Prompt::AnchorOrientation => {
                let v = parse_vector(line)?;
                self.anchor_orientation = Some(Orientation::from(v));
                (Answer::Vector(v), Prompt::AnchorType)
            }
            Prompt::AnchorType => {
                let name = parse_name(line)?;
                self.type_id = Some(name.clone());
                (Answer::Name(name), Prompt::ItemPosition(0))
            }
            Prompt::ItemPosition(i) => {
                let v = parse_vector(line)?;
                self.pending.position = Some(Position::from(v));
                (Answer::Vector(v), Prompt::ItemOrientation(i))
            }
            Prompt::ItemOrientation(i) => {
                let v = parse_vector(line)?;
                self.pending.orientation = Some(Orientation::from(v));
                (Answer::Vector(v), Prompt::ItemType(i))
            }
            Prompt::ItemType(i) => {
                let name = parse_name(line)?;
                let pending = std::mem::take(&mut self.pending);
                self.items.push(ItemDefinition {
                    type_name: name.clone(),
                    original: Pose::new(
                        pending.position.unwrap_or_default(),
                        pending.orientation.unwrap_or_default(),
                    ),
                });
                (Answer::Name(name), Prompt::AddAnother(i))
            }
            Prompt::AddAnother(i) => {
                let more = parse_confirm(line);
                if !more {
                    self.prompt = None;
                    return Ok(Answer::Confirm(false));
                }
                (Answer::Confirm(true), Prompt::ItemPosition(i + 1))
            }
        };

        self.prompt = Some(next);
        Ok(answer)
    }

    /// The collected definition. Fails if the protocol has not finished.
    pub fn finish(self) -> std::result::Result<AnchorDefinition, AuthoringError> {
        if let Some(prompt) = self.prompt {
            return Err(AuthoringError::Incomplete(prompt.text().trim().to_string()));
        }
        let missing = || AuthoringError::Incomplete(Prompt::AnchorType.text().trim().to_string());
        Ok(AnchorDefinition {
            type_id: self.type_id.ok_or_else(missing)?,
            original: Pose::new(
                self.anchor_position.unwrap_or_default(),
                self.anchor_orientation.unwrap_or_default(),
            ),
            items: self.items,
        })
    }
}

/// Render a definition as a list entry for the `anchors:` table.
pub fn render_registry_entry(definition: &AnchorDefinition) -> Result<String> {
    let yaml =
        serde_yaml::to_string(std::slice::from_ref(definition)).map_err(PlacementError::Registry)?;
    let mut out = String::with_capacity(yaml.len() + 64);
    for line in yaml.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}
