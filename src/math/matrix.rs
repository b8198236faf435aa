use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{Add, Sub, Mul};

/// Row-major dense matrix. A batch of samples is stored one sample per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![value; cols]; rows]
        }
    }

    /// Samples every entry uniformly from [0, 1).
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>();
            }
        }

        res
    }

    /// Glorot (Xavier) uniform initialization: samples from
    /// U(-limit, limit) with `limit = sqrt(6 / (fan_in + fan_out))`.
    ///
    /// Shape: (fan_in, fan_out), matching the `x · W` convention of `Dense`.
    pub fn glorot_uniform<R: Rng + ?Sized>(fan_in: usize, fan_out: usize, rng: &mut R) -> Matrix {
        let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
        let mut res = Matrix::zeros(fan_in, fan_out);
        for i in 0..fan_in {
            for j in 0..fan_out {
                res.data[i][j] = rng.gen_range(-limit..limit);
            }
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, Vec::len),
            data
        }
    }

    /// Builds an `n × 1` column matrix.
    pub fn column(values: Vec<f64>) -> Matrix {
        Matrix::from_data(values.into_iter().map(|v| vec![v]).collect())
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    /// Gathers the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    /// Matrix product without consuming either operand.
    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order walks both right-hand rows and output rows contiguously.
        for i in 0..self.rows {
            let out = &mut res.data[i];
            for k in 0..self.cols {
                let a = self.data[i][k];
                if a == 0.0 {
                    continue;
                }
                for (o, b) in out.iter_mut().zip(rhs.data[k].iter()) {
                    *o += a * b;
                }
            }
        }

        res
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.zip_with(rhs, |a, b| a * b)
    }

    /// Adds a `1 × cols` row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        assert_eq!(row.rows, 1, "broadcast operand must be a single row");
        assert_eq!(row.cols, self.cols, "broadcast operand has the wrong width");
        let bias = &row.data[0];
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|r| r.iter().zip(bias.iter()).map(|(x, b)| x + b).collect())
                .collect(),
        }
    }

    /// Column sums as a `1 × cols` matrix.
    pub fn sum_rows(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (s, x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        Matrix { rows: 1, cols: self.cols, data: vec![sums] }
    }

    pub fn scale(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    pub fn squared_sum(&self) -> f64 {
        self.data.iter().flatten().map(|x| x * x).sum()
    }

    /// Per-column minimum. Empty for a matrix with no rows.
    pub fn column_min(&self) -> Vec<f64> {
        self.column_fold(f64::INFINITY, f64::min)
    }

    /// Per-column maximum. Empty for a matrix with no rows.
    pub fn column_max(&self) -> Vec<f64> {
        self.column_fold(f64::NEG_INFINITY, f64::max)
    }

    /// Per-column mean and biased variance.
    pub fn column_mean_var(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.rows as f64;
        let mean: Vec<f64> = self.sum_rows().data[0].iter().map(|s| s / n).collect();
        let mut var = vec![0.0; self.cols];
        for row in &self.data {
            for j in 0..self.cols {
                var[j] += (row[j] - mean[j]).powi(2);
            }
        }
        for v in &mut var {
            *v /= n;
        }
        (mean, var)
    }

    fn column_fold(&self, init: f64, f: fn(f64, f64) -> f64) -> Vec<f64> {
        if self.rows == 0 {
            return vec![];
        }
        let mut acc = vec![init; self.cols];
        for row in &self.data {
            for (a, &x) in acc.iter_mut().zip(row.iter()) {
                *a = f(*a, x);
            }
        }
        acc
    }

    fn zip_with<F>(&self, rhs: &Matrix, f: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .zip(rhs.data.iter())
                .map(|(ra, rb)| ra.iter().zip(rb.iter()).map(|(&a, &b)| f(a, b)).collect())
                .collect(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.matmul(&rhs)
    }
}
