use tracing::debug;

use crate::errors::{ParserError, Pass};
use crate::model::Sensor;
use crate::table::RowTable;

const SENSOR_HEADER_ROW: usize = 6;
const SENSOR_COUNT: usize = 6;

/// Sensor rows are read by position only; the header text is not consulted.
pub(crate) fn extract_sensors(table: &RowTable) -> Result<Vec<Sensor>, ParserError> {
    table.require_row(Pass::Sensors, SENSOR_HEADER_ROW)?;

    let first = SENSOR_HEADER_ROW + 1;
    let mut sensors = Vec::with_capacity(SENSOR_COUNT);

    for row_index in first..first + SENSOR_COUNT {
        let row = table.require_row(Pass::Sensors, row_index)?;
        let cell = |column: usize| row.get(column).cloned().unwrap_or_default();

        sensors.push(Sensor {
            sensor_type: cell(0),
            present: cell(1),
            smrec: cell(2),
            zeroavg: cell(3),
            model: cell(4),
        });
    }

    debug!(
        present = sensors.iter().filter(|s| s.is_present()).count(),
        "extracted sensors"
    );
    Ok(sensors)
}
