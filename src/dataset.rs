use crate::{error::Error, pose::AngleSet};
use std::io::Write;

/// One output row: a single landmark of a single frame, plus the frame's
/// 8 angles repeated across all of its rows.
#[derive(Debug, Clone)]
pub(crate) struct FrameRecord {
    pub(crate) frame: usize,
    pub(crate) id: usize,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) z: f32,
    pub(crate) vis: f32,
    pub(crate) angles: AngleSet,
}

/// The 33 records produced from one successfully detected frame.
pub(crate) type Fragment = Vec<FrameRecord>;

const HEADER: &str = "frame,id,x,y,z,vis,angle_1,angle_2,angle_3,angle_4,angle_5,angle_6,angle_7,angle_8";

/// Append-only accumulator for the whole batch, written once at the end.
#[derive(Debug, Default)]
pub(crate) struct Dataset {
    records: Vec<FrameRecord>,
}

impl Dataset {
    pub(crate) fn append(&mut self, mut fragment: Fragment) {
        self.records.append(&mut fragment);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Write the delimited table: header first, then one row per record.
    /// Missing angles serialize as the `NaN` token.
    pub(crate) fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writeln!(writer, "{}", HEADER).map_err(Error::WriteDataset)?;
        for record in &self.records {
            write!(
                writer,
                "{},{},{},{},{},{}",
                record.frame, record.id, record.x, record.y, record.z, record.vis
            )
            .map_err(Error::WriteDataset)?;
            for angle in &record.angles {
                write!(writer, ",{}", angle).map_err(Error::WriteDataset)?;
            }
            writeln!(writer).map_err(Error::WriteDataset)?;
        }
        Ok(())
    }
}
