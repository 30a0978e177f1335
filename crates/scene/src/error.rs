use crate::panel::PanelField;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("selection edit rejected while a vertex drag is in progress")]
    DragInProgress,
    #[error("selection tool is not attached to the map")]
    Detached,
    #[error("selection bounds must be finite")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PanelError {
    #[error("unknown selection field {0:?}")]
    UnknownField(String),
    #[error("selection field {0} is derived and cannot be edited")]
    ReadOnlyField(PanelField),
    #[error("selection field {field}: {value:?} is not a finite number")]
    InvalidNumber { field: PanelField, value: String },
}
