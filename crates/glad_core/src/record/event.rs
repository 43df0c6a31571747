//! Event record variant.

use std::borrow::Cow;

/// Free-form metadata carried by an event record.
///
/// Each field is stored as the raw bytes received and decoded to text only
/// when asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvrField {
    /// EVR definition name.
    Name,
    /// Formatted message.
    Message,
    /// Flight software task that emitted the event.
    TaskName,
    /// Sequence identifier.
    SequenceId,
    /// Category sequence identifier.
    CategorySequenceId,
    /// Address stack at emission.
    AddressStack,
    /// Source file or module.
    Source,
    /// Task identifier.
    TaskId,
    /// Error number.
    Errno,
}

impl EvrField {
    /// Every field, in storage order.
    pub const ALL: [EvrField; 9] = [
        EvrField::Name,
        EvrField::Message,
        EvrField::TaskName,
        EvrField::SequenceId,
        EvrField::CategorySequenceId,
        EvrField::AddressStack,
        EvrField::Source,
        EvrField::TaskId,
        EvrField::Errno,
    ];

    const fn index(self) -> usize {
        match self {
            EvrField::Name => 0,
            EvrField::Message => 1,
            EvrField::TaskName => 2,
            EvrField::SequenceId => 3,
            EvrField::CategorySequenceId => 4,
            EvrField::AddressStack => 5,
            EvrField::Source => 6,
            EvrField::TaskId => 7,
            EvrField::Errno => 8,
        }
    }

    /// Lower-case field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EvrField::Name => "name",
            EvrField::Message => "message",
            EvrField::TaskName => "task_name",
            EvrField::SequenceId => "sequence_id",
            EvrField::CategorySequenceId => "category_sequence_id",
            EvrField::AddressStack => "address_stack",
            EvrField::Source => "source",
            EvrField::TaskId => "task_id",
            EvrField::Errno => "errno",
        }
    }
}

/// A discrete logged event with a severity level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventRecord {
    evr_id: i64,
    level: String,
    metadata: [Vec<u8>; 9],
    realtime: bool,
    fsw: bool,
}

impl EventRecord {
    /// Creates a realtime flight software event with empty metadata.
    pub fn new(evr_id: i64, level: impl Into<String>) -> Self {
        Self {
            evr_id,
            level: level.into(),
            metadata: Default::default(),
            realtime: true,
            fsw: true,
        }
    }

    /// Sets one metadata field from raw bytes.
    #[must_use]
    pub fn with_field(mut self, field: EvrField, raw: impl Into<Vec<u8>>) -> Self {
        self.metadata[field.index()] = raw.into();
        self
    }

    /// Sets the message text.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.with_field(EvrField::Message, message.into().into_bytes())
    }

    /// Sets the EVR definition name.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field(EvrField::Name, name.into().into_bytes())
    }

    /// Sets the realtime flag.
    #[must_use]
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Sets the flight software flag. False means ground support equipment.
    #[must_use]
    pub fn with_fsw(mut self, fsw: bool) -> Self {
        self.fsw = fsw;
        self
    }

    /// EVR identifier.
    #[must_use]
    pub fn evr_id(&self) -> i64 {
        self.evr_id
    }

    /// Severity level, e.g. `WARNING_HI`. Doubles as the record identifier.
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Raw bytes of a metadata field.
    #[must_use]
    pub fn raw(&self, field: EvrField) -> &[u8] {
        &self.metadata[field.index()]
    }

    /// Text of a metadata field. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn text(&self, field: EvrField) -> Cow<'_, str> {
        String::from_utf8_lossy(self.raw(field))
    }

    /// Message text.
    #[must_use]
    pub fn message(&self) -> Cow<'_, str> {
        self.text(EvrField::Message)
    }

    /// EVR definition name.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        self.text(EvrField::Name)
    }

    /// Realtime flag.
    #[must_use]
    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Flight software flag.
    #[must_use]
    pub fn is_fsw(&self) -> bool {
        self.fsw
    }
}
