//! # Tutorial: Decoding Responses with decant
//!
//! Learn to turn HTTP responses into typed values step by step.
//!
//! ## Chapters
//!
//! 1. [Getting Started][chapter_0] - Your first pipeline
//! 2. [Interceptors][chapter_1] - Bytes, parsed and instance stages
//! 3. [Error Handling][chapter_2] - Telling failures apart
//!
//! Ready? Start with [Chapter 0: Getting Started][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
