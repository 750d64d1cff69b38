use serde::Deserialize;

use crate::calc::GradeReport;
use crate::notice::Notice;
use crate::rows::RowSet;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything the UI sees: the editable rows, the last computed result and the
/// error notice.
#[derive(Debug, Default)]
pub struct AppState {
    pub rows: RowSet,
    pub report: Option<GradeReport>,
    pub notice: Notice,
}
