use crate::core::frame::Frame;
use crate::domain::model::{ChartJob, Computation, Computed, Outcome};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn csv_file(&self) -> &str;
    fn computation(&self) -> Computation;
    fn variables(&self) -> Option<&str>;
    fn plot_dir(&self) -> &str;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Frame>;
    fn compute(&self, frame: &Frame) -> Result<Computed>;
    fn render(&self, chart: Option<ChartJob>) -> Result<Outcome>;
}
