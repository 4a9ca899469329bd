//! Benchmark case set
//!
//! Every case reads the two seeded inputs of one representation and writes
//! its output buffer. Cases are plain function pointers over a [`Workload`];
//! the declared order of [`CASES`] is the run order.

use ndarray::Zip;
use serde::Serialize;
use std::fmt;

use crate::workload::Workload;

/// Operation group; the console report separates sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Scale,
    Normalize,
    Add,
    Add2d,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Scale => write!(f, "scale"),
            Section::Normalize => write!(f, "normalize"),
            Section::Add => write!(f, "add"),
            Section::Add2d => write!(f, "2d add"),
        }
    }
}

/// Storage layout a case runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    MyVec,
    NaVector4,
    Float4,
    Wide,
    NdArray,
    FlatArray,
    MyVec2d,
    NaVector2d,
    Wide2d,
}

/// A named benchmark operation.
#[derive(Clone, Copy)]
pub struct BenchCase {
    pub name: &'static str,
    pub section: Section,
    pub repr: Representation,
    pub run: fn(&mut Workload),
}

impl fmt::Debug for BenchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchCase")
            .field("name", &self.name)
            .field("section", &self.section)
            .field("repr", &self.repr)
            .finish()
    }
}

const fn case(
    name: &'static str,
    section: Section,
    repr: Representation,
    run: fn(&mut Workload),
) -> BenchCase {
    BenchCase { name, section, repr, run }
}

use Representation as R;
use Section as S;

pub static CASES: &[BenchCase] = &[
    case("MyVecScale", S::Scale, R::MyVec, my_vec_scale),
    case("NaVector4Scale", S::Scale, R::NaVector4, na_vector4_scale),
    case("Float4Scale", S::Scale, R::Float4, float4_scale),
    case("WideScale", S::Scale, R::Wide, wide_scale),
    case("NdArrayScale", S::Scale, R::NdArray, nd_array_scale),
    case("ArrayScale", S::Scale, R::FlatArray, array_scale),
    case("MyVecNorm", S::Normalize, R::MyVec, my_vec_norm),
    case("NaVector4Norm", S::Normalize, R::NaVector4, na_vector4_norm),
    case("Float4Norm", S::Normalize, R::Float4, float4_norm),
    case("WideNorm", S::Normalize, R::Wide, wide_norm),
    case("NdArrayNorm", S::Normalize, R::NdArray, nd_array_norm),
    case("MyVecAdd", S::Add, R::MyVec, my_vec_add),
    case("NaVector4Add", S::Add, R::NaVector4, na_vector4_add),
    case("Float4Add", S::Add, R::Float4, float4_add),
    case("WideAdd", S::Add, R::Wide, wide_add),
    case("NdArrayAdd", S::Add, R::NdArray, nd_array_add),
    case("ArrayAdd", S::Add, R::FlatArray, array_add),
    case("MyVec2dAdd", S::Add2d, R::MyVec2d, my_vec2d_add),
    case("NaVector2dAdd", S::Add2d, R::NaVector2d, na_vector2d_add),
    case("Wide2dAdd", S::Add2d, R::Wide2d, wide2d_add),
];

/// Cases whose name contains `filter` (case-insensitive), in run order.
pub fn select(filter: Option<&str>) -> Vec<&'static BenchCase> {
    match filter {
        None => CASES.iter().collect(),
        Some(f) => {
            let needle = f.to_lowercase();
            CASES
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle))
                .collect()
        }
    }
}

// Scale

fn my_vec_scale(w: &mut Workload) {
    let s = w.scale;
    let b = &mut w.my_vec;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = *x * s;
    }
}

fn na_vector4_scale(w: &mut Workload) {
    let s = w.scale;
    let b = &mut w.na_vec4;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = *x * s;
    }
}

fn float4_scale(w: &mut Workload) {
    let s = w.scale;
    let b = &mut w.float4;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = *x * s;
    }
}

fn wide_scale(w: &mut Workload) {
    let s = w.scale;
    let b = &mut w.wide;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = *x * s;
    }
}

fn nd_array_scale(w: &mut Workload) {
    let s = w.scale;
    let m = &mut w.matrix;
    Zip::from(&mut m.y).and(&m.x).for_each(|y, &x| *y = x * s);
}

fn array_scale(w: &mut Workload) {
    let s = w.scale;
    let b = &mut w.flat;
    for (y, x) in b.y.chunks_exact_mut(4).zip(b.x.chunks_exact(4)) {
        y[0] = x[0] * s;
        y[1] = x[1] * s;
        y[2] = x[2] * s;
        y[3] = x[3] * s;
    }
}

// Normalize

fn my_vec_norm(w: &mut Workload) {
    let b = &mut w.my_vec;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = x.normalize();
    }
}

fn na_vector4_norm(w: &mut Workload) {
    let b = &mut w.na_vec4;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        let s = 1.0f32 / x.norm_squared().sqrt();
        *y = *x * s;
    }
}

fn float4_norm(w: &mut Workload) {
    let b = &mut w.float4;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = x.normalize();
    }
}

fn wide_norm(w: &mut Workload) {
    let b = &mut w.wide;
    for (y, x) in b.y.iter_mut().zip(&b.x) {
        *y = x.normalize4();
    }
}

fn nd_array_norm(w: &mut Workload) {
    let m = &mut w.matrix;
    Zip::from(m.y.rows_mut()).and(m.x.rows()).for_each(|mut y, x| {
        let s = 1.0f32 / x.dot(&x).sqrt();
        Zip::from(&mut y).and(&x).for_each(|y, &x| *y = x * s);
    });
}

// Add

fn my_vec_add(w: &mut Workload) {
    let b = &mut w.my_vec;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = *x + *x2;
    }
}

fn na_vector4_add(w: &mut Workload) {
    let b = &mut w.na_vec4;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = x + x2;
    }
}

fn float4_add(w: &mut Workload) {
    let b = &mut w.float4;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = *x + *x2;
    }
}

fn wide_add(w: &mut Workload) {
    let b = &mut w.wide;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = *x + *x2;
    }
}

fn nd_array_add(w: &mut Workload) {
    let m = &mut w.matrix;
    Zip::from(&mut m.y)
        .and(&m.x)
        .and(&m.x2)
        .for_each(|y, &x, &x2| *y = x + x2);
}

fn array_add(w: &mut Workload) {
    let b = &mut w.flat;
    let inputs = b.x.chunks_exact(4).zip(b.x2.chunks_exact(4));
    for (y, (x, x2)) in b.y.chunks_exact_mut(4).zip(inputs) {
        y[0] = x[0] + x2[0];
        y[1] = x[1] + x2[1];
        y[2] = x[2] + x2[2];
        y[3] = x[3] + x2[3];
    }
}

// 2D add

fn my_vec2d_add(w: &mut Workload) {
    let b = &mut w.my_vec2d;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = *x + *x2;
    }
}

fn na_vector2d_add(w: &mut Workload) {
    let b = &mut w.na_vec2d;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = x + x2;
    }
}

fn wide2d_add(w: &mut Workload) {
    let b = &mut w.wide2d;
    for ((y, x), x2) in b.y.iter_mut().zip(&b.x).zip(&b.x2) {
        *y = *x + *x2;
    }
}
