//! Python bindings for ferric-bloom using PyO3

use crate::bloom::BloomFilter;
use numpy::{IntoPyArray, PyArray1};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict, PyString};

/// `str` as UTF-8, `bytes` unchanged, anything else through `str(item)`
fn item_bytes(item: &PyAny) -> PyResult<Vec<u8>> {
    if let Ok(s) = item.downcast::<PyString>() {
        return Ok(s.to_str()?.as_bytes().to_vec());
    }
    if let Ok(b) = item.downcast::<PyBytes>() {
        return Ok(b.as_bytes().to_vec());
    }
    Ok(item.str()?.to_str()?.as_bytes().to_vec())
}

/// Python wrapper for BloomFilter
#[pyclass(name = "BloomFilter")]
struct PyBloomFilter {
    inner: BloomFilter,
}

#[pymethods]
impl PyBloomFilter {
    #[new]
    fn new(capacity: i64, error_rate: f64) -> PyResult<Self> {
        let filter = BloomFilter::new(capacity, error_rate)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        Ok(PyBloomFilter { inner: filter })
    }

    fn add(&mut self, item: &PyAny) -> PyResult<()> {
        let bytes = item_bytes(item)?;
        self.inner.add(&bytes);
        Ok(())
    }

    fn __contains__(&self, item: &PyAny) -> PyResult<bool> {
        let bytes = item_bytes(item)?;
        Ok(self.inner.contains(&bytes))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    #[getter]
    fn m(&self) -> usize {
        self.inner.num_bits()
    }

    #[getter]
    fn k(&self) -> usize {
        self.inner.num_hashes()
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[getter]
    fn error_rate(&self) -> f64 {
        self.inner.error_rate()
    }

    fn bit_count(&self) -> usize {
        self.inner.bit_count()
    }

    fn fill_ratio(&self) -> f64 {
        self.inner.fill_ratio()
    }

    fn hash_indices<'py>(&self, py: Python<'py>, item: &PyAny) -> PyResult<&'py PyArray1<usize>> {
        let bytes = item_bytes(item)?;
        Ok(self.inner.hash_indices(&bytes).into_pyarray(py))
    }

    fn probe(&self, item: &PyAny) -> PyResult<Vec<(usize, bool)>> {
        let bytes = item_bytes(item)?;
        Ok(self.inner.probe(&bytes))
    }

    /// First `n` bits of the filter as 0/1 values
    fn sample_bits<'py>(&self, py: Python<'py>, n: usize) -> &'py PyArray1<u8> {
        let bits: Vec<u8> = self
            .inner
            .bits()
            .sample(n)
            .into_iter()
            .map(u8::from)
            .collect();
        bits.into_pyarray(py)
    }

    fn stats(&self, py: Python<'_>) -> PyResult<PyObject> {
        let stats = self.inner.stats();
        let dict = PyDict::new(py);
        dict.set_item("capacity", stats.capacity)?;
        dict.set_item("error_rate", stats.error_rate)?;
        dict.set_item("bits_total", stats.bits_total)?;
        dict.set_item("bits_on", stats.bits_on)?;
        dict.set_item("fill_ratio", stats.fill_ratio_percent)?;
        dict.set_item("hash_functions", stats.hash_functions)?;
        dict.set_item("elements_added", stats.elements_added)?;
        Ok(dict.to_object(py))
    }

    fn __str__(&self) -> String {
        format!(
            "BloomFilter(m={}, k={}, elements={}, fill={:.6})",
            self.inner.num_bits(),
            self.inner.num_hashes(),
            self.inner.len(),
            self.inner.fill_ratio()
        )
    }

    fn __repr__(&self) -> String {
        format!(
            "BloomFilter(capacity={}, error_rate={})",
            self.inner.capacity(),
            self.inner.error_rate()
        )
    }
}

/// Python module definition
#[pymodule]
fn ferric_bloom(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBloomFilter>()?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
