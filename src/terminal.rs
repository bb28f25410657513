mod bullet_points;

pub use bullet_points::{BulletPointPrinter, LineWriter, StdoutLineWriter};

#[cfg(test)]
pub use bullet_points::RecordingLineWriter;
