use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use staff_dashboard::data::batch::to_record_batch;
use staff_dashboard::data::employee::sample_dataset;
use staff_dashboard::data::filter::FilteredView;

/// Write the embedded employee sample to `sample_employees.parquet`.
fn main() -> Result<()> {
    env_logger::init();

    let dataset = sample_dataset();
    let batch = to_record_batch(&FilteredView::all(dataset)).context("building record batch")?;

    let output_path = "sample_employees.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!(
        "Wrote {} employees ({} columns) to {output_path}",
        batch.num_rows(),
        batch.num_columns()
    );
    Ok(())
}
