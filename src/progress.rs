use log::info;
use serde::Serialize;

/// Pipeline stages with their fixed progress percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Parsing,
    SendingRequest,
    ResponseReceived,
    ProcessingResults,
    RenderingReport,
    Complete,
    Error,
}

impl Stage {
    pub fn percent(self) -> u8 {
        match self {
            Stage::Parsing => 10,
            Stage::SendingRequest => 20,
            Stage::ResponseReceived => 30,
            Stage::ProcessingResults => 50,
            Stage::RenderingReport => 75,
            Stage::Complete => 100,
            Stage::Error => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Parsing => "Parsing JSON files...",
            Stage::SendingRequest => "Sending request to API...",
            Stage::ResponseReceived => "Received response from API...",
            Stage::ProcessingResults => "Processing results...",
            Stage::RenderingReport => "Rendering evaluation report...",
            Stage::Complete => "Complete!",
            Stage::Error => "Error occurred",
        }
    }
}

/// One emitted progress update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub percent: u8,
    pub label: String,
}

/// Emits the fixed stage sequence for one run and records it for observers.
///
/// Percentages never decrease across a run, with one exception: any failure
/// emits a terminal error event at 0% instead of continuing the sequence.
pub struct ProgressReporter {
    events: Vec<ProgressEvent>,
    observer: Option<Box<dyn FnMut(&ProgressEvent) + Send>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            observer: None,
        }
    }

    /// Attach a callback invoked on every event, in emission order.
    pub fn with_observer(observer: Box<dyn FnMut(&ProgressEvent) + Send>) -> Self {
        Self {
            events: Vec::new(),
            observer: Some(observer),
        }
    }

    /// Advance to a pipeline stage. Stages carry fixed percentages, so
    /// calling them in pipeline order keeps the sequence non-decreasing.
    pub fn advance(&mut self, stage: Stage) {
        debug_assert!(stage != Stage::Error, "use fail() for the error state");
        debug_assert!(
            self.events.last().map_or(0, |e| e.percent) <= stage.percent(),
            "progress went backwards"
        );
        self.emit(stage, stage.label().to_string());
    }

    /// Terminal error state: resets the bar to 0% instead of continuing.
    pub fn fail(&mut self, detail: &str) {
        self.emit(Stage::Error, format!("{}: {}", Stage::Error.label(), detail));
    }

    fn emit(&mut self, stage: Stage, label: String) {
        let event = ProgressEvent {
            stage,
            percent: stage.percent(),
            label,
        };
        info!("[{:>3}%] {}", event.percent, event.label);
        if let Some(observer) = &mut self.observer {
            observer(&event);
        }
        self.events.push(event);
    }

    /// All events emitted so far, in order.
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
