//! Matrix file reader.

use super::Matrix;
use crate::error::{MatviewError, Result};
use ndarray::Array2;
use netcdf::types::{FloatType, IntType, NcVariableType};
use std::path::Path;

/// Loads matrices from NetCDF or plain-text files.
#[derive(Debug)]
pub struct MatrixReader;

impl MatrixReader {
    /// Read a matrix from `path`.
    ///
    /// For NetCDF files `var` selects the variable; without it the first
    /// two-dimensional variable is used. Text files ignore `var`.
    pub fn read_file(path: &Path, var: Option<&str>) -> Result<Matrix> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        let matrix = match extension.as_str() {
            "nc" | "nc4" | "netcdf" | "cdf" => Self::read_netcdf(path, var)?,
            "txt" | "dat" | "mat" | "csv" | "tsv" => Self::read_text(path)?,
            other => return Err(MatviewError::unsupported_format(other)),
        };

        tracing::info!(
            "Loaded matrix {} ({}x{})",
            matrix.name,
            matrix.data().ncols(),
            matrix.data().nrows()
        );
        Ok(matrix)
    }

    /// Read a whitespace or comma separated text matrix.
    ///
    /// The first data line becomes row y = 0. Blank lines and lines starting
    /// with `#` are skipped.
    pub fn read_text(path: &Path) -> Result<Matrix> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MatviewError::file_open(path.to_path_buf(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "matrix".to_string());
        Self::parse_text(&name, &text)
    }

    /// Parse text matrix content.
    pub fn parse_text(name: &str, text: &str) -> Result<Matrix> {
        let mut values = Vec::new();
        let mut width = None;
        let mut rows = 0usize;

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut count = 0usize;
            for token in line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                let v: f64 = token
                    .parse()
                    .map_err(|_| MatviewError::parse(idx + 1, format!("invalid number '{}'", token)))?;
                values.push(v);
                count += 1;
            }

            match width {
                None => width = Some(count),
                Some(w) if w != count => {
                    return Err(MatviewError::parse(
                        idx + 1,
                        format!("expected {} columns, found {}", w, count),
                    ));
                },
                Some(_) => {},
            }
            rows += 1;
        }

        let width = width.unwrap_or(0);
        if rows == 0 || width == 0 {
            return Err(MatviewError::EmptyMatrix);
        }

        let data = Array2::from_shape_vec((rows, width), values)
            .map_err(|e| MatviewError::parse(0, e.to_string()))?;
        Ok(Matrix::new(name, data))
    }

    fn read_netcdf(path: &Path, var: Option<&str>) -> Result<Matrix> {
        let file = netcdf::open(path)?;

        let variable = match var {
            Some(name) => {
                let nc_path = name.trim_start_matches('/');
                file.variable(nc_path)
                    .ok_or_else(|| MatviewError::variable_not_found(name))?
            },
            None => file
                .variables()
                .find(|v| v.dimensions().len() == 2)
                .ok_or_else(|| MatviewError::variable_not_found("<any 2-D variable>"))?,
        };

        let name = variable.name().to_string();
        let shape: Vec<usize> = variable.dimensions().iter().map(|d| d.len()).collect();
        if shape.len() != 2 {
            return Err(MatviewError::NotTwoDimensional {
                name,
                ndim: shape.len(),
            });
        }
        if shape[0] == 0 || shape[1] == 0 {
            return Err(MatviewError::EmptyMatrix);
        }

        let scale_factor = Self::numeric_attribute(&variable, "scale_factor").unwrap_or(1.0);
        let add_offset = Self::numeric_attribute(&variable, "add_offset").unwrap_or(0.0);

        let values = Self::read_values(&variable)?;
        let mut data = Array2::from_shape_vec((shape[0], shape[1]), values)
            .map_err(|e| MatviewError::NetCDF(format!("Invalid shape/data size: {}", e)))?;

        if scale_factor != 1.0 || add_offset != 0.0 {
            data.mapv_inplace(|v| v * scale_factor + add_offset);
        }

        Ok(Matrix::new(name, data))
    }

    fn numeric_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
        use netcdf::AttributeValue;

        let attr = var.attributes().find(|a| a.name() == name)?;
        match attr.value().ok()? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(v as f64),
            AttributeValue::Int(v) => Some(v as f64),
            AttributeValue::Short(v) => Some(v as f64),
            AttributeValue::Doubles(v) => v.first().copied(),
            AttributeValue::Floats(v) => v.first().map(|&x| x as f64),
            _ => None,
        }
    }

    fn read_values(var: &netcdf::Variable<'_>) -> Result<Vec<f64>> {
        let values: Vec<f64> = match var.vartype() {
            NcVariableType::Float(FloatType::F64) => var.get_values(..)?,
            NcVariableType::Float(FloatType::F32) => {
                let values: Vec<f32> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            NcVariableType::Int(IntType::I64) => {
                let values: Vec<i64> = var.get_values(..)?;
                values.into_iter().map(|x| x as f64).collect()
            },
            NcVariableType::Int(IntType::U64) => {
                let values: Vec<u64> = var.get_values(..)?;
                values.into_iter().map(|x| x as f64).collect()
            },
            NcVariableType::Int(IntType::I32) => {
                let values: Vec<i32> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            NcVariableType::Int(IntType::U32) => {
                let values: Vec<u32> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            NcVariableType::Int(IntType::I16) => {
                let values: Vec<i16> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            NcVariableType::Int(IntType::U16) => {
                let values: Vec<u16> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            NcVariableType::Int(IntType::I8) => {
                let values: Vec<i8> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            NcVariableType::Int(IntType::U8) => {
                let values: Vec<u8> = var.get_values(..)?;
                values.into_iter().map(f64::from).collect()
            },
            other => {
                return Err(MatviewError::NetCDF(format!(
                    "Unsupported variable type: {:?}",
                    other
                )))
            },
        };
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MatrixSource;

    #[test]
    fn parses_whitespace_and_commas() {
        let m = MatrixReader::parse_text("t", "# counts\n1 2 3\n\n4,5,6\n").unwrap();
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.value_at(0, 0), 1.0);
        assert_eq!(m.value_at(2, 1), 6.0);
    }

    #[test]
    fn rejects_ragged_rows() {
        let res = MatrixReader::parse_text("t", "1 2\n3\n");
        assert!(matches!(res, Err(MatviewError::Parse { line: 2, .. })));
    }

    #[test]
    fn rejects_bad_numbers_and_empty_input() {
        assert!(matches!(
            MatrixReader::parse_text("t", "1 abc\n"),
            Err(MatviewError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            MatrixReader::parse_text("t", "# nothing\n"),
            Err(MatviewError::EmptyMatrix)
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let res = MatrixReader::read_file(Path::new("matrix.xyz"), None);
        assert!(matches!(res, Err(MatviewError::UnsupportedFormat { .. })));
    }
}
