//! Incoming chat lines

use crate::formatting::strip_formatting;
use crate::recipient::RecipientType;
use wynnparse_core::ChatChannel;

/// A chat line as delivered by the host
///
/// Carries the styled (coded) text; the unformatted form is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    coded: String,
    channel: ChatChannel,
}

impl RawLine {
    pub fn new(coded: impl Into<String>, channel: ChatChannel) -> Self {
        Self {
            coded: coded.into(),
            channel,
        }
    }

    pub fn foreground(coded: impl Into<String>) -> Self {
        Self::new(coded, ChatChannel::Foreground)
    }

    pub fn background(coded: impl Into<String>) -> Self {
        Self::new(coded, ChatChannel::Background)
    }

    /// Styled text including formatting codes
    pub fn coded(&self) -> &str {
        &self.coded
    }

    pub fn channel(&self) -> ChatChannel {
        self.channel
    }

    /// Text with formatting codes removed
    pub fn unformatted(&self) -> String {
        strip_formatting(&self.coded)
    }

    /// Who the line is addressed to
    pub fn recipient(&self) -> RecipientType {
        RecipientType::classify(&self.coded)
    }
}
