use flate2::read::MultiGzDecoder;
use std::{
    error::Error,
    ffi::OsStr,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::catalog::Catalog;
use crate::records::CourseRecord;
use crate::utils::normalize;

pub fn is_compressed<P: AsRef<Path>>(p: &P) -> bool {
    p.as_ref().extension() == Some(OsStr::new("gz"))
}

/// Opens `p` for line reading, decompressing it when it ends in `.gz`.
pub fn read_with_gz<P: AsRef<Path>>(p: &P) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
    let file = File::open(p)?;

    if is_compressed(p) {
        debug!("reading {} as gzip", p.as_ref().display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads course records written one JSON object per line.
#[must_use]
pub struct CatalogReader<R: BufRead> {
    reader: R,
    comment: char,
}

impl<R: BufRead> CatalogReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            comment: '#',
        }
    }

    pub fn with_comment(mut self, comment: char) -> Self {
        self.comment = comment;
        self
    }

    pub fn records(self) -> Result<Vec<CourseRecord>, Box<dyn Error>> {
        let mut records = vec![];

        for (index, line) in self.reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with(self.comment) {
                continue;
            }

            let mut record: CourseRecord = serde_json::from_str(line).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid record on line {}: {}", index + 1, e),
                )
            })?;
            record.name = normalize(&record.name);

            let title = record
                .title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string);

            match title {
                Some(title) => record.title = Some(title),
                None => {
                    warn!("Course without a title [name: {}]", record.name);
                    continue;
                }
            }

            records.push(record);
        }

        Ok(records)
    }

    pub fn finish(self) -> Result<Catalog, Box<dyn Error>> {
        let records = self.records()?;
        info!("compiling {} courses", records.len());

        Ok(Catalog::compile(records))
    }
}
