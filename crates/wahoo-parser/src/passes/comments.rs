use crate::errors::{ParserError, Pass};
use crate::options::CommentMode;
use crate::table::RowTable;

const COMMENT_ROW: usize = 4;

pub(crate) fn extract_comments(table: &RowTable, mode: CommentMode) -> Result<String, ParserError> {
    let row = table.require_row(Pass::Comments, COMMENT_ROW)?;

    let comment = match mode {
        CommentMode::FirstCell => row.first().cloned().unwrap_or_default(),
        CommentMode::WholeRow => {
            let used = row
                .iter()
                .rposition(|cell| !cell.trim().is_empty())
                .map_or(0, |last| last + 1);
            row[..used].join(",")
        }
    };

    Ok(comment)
}
