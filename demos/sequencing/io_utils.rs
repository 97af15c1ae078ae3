// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    num::ParseIntError,
    path::Path,
};

/// A single machine scheduling instance. Jobs are numbered after the line on
/// which they appear; due dates are optional and the weight of a job defaults
/// to one when it is not specified.
#[derive(Debug, Clone)]
pub struct SchedulingInstance {
    pub nb_jobs: usize,
    pub ptime: Vec<isize>,
    pub duedate: Vec<Option<isize>>,
    pub weight: Vec<isize>,
}

/// This enumeration simply groups the kind of errors that might occur when
/// parsing a scheduling instance from file. There can be io errors (file
/// unavailable ?), format errors (e.g. the file is not an instance but
/// contains the text of your next paper), or parse int errors (which are
/// actually a variant of the format error since it tells you that the parser
/// expected an integer number but got ... something else).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The parser expected to read something that was an integer but got some garbage
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// The file was not properly formatted.
    #[error("ill formed instance")]
    Format,
}

/// This function is used to read a scheduling instance from file. Each job is
/// described on its own line as `id ptime [duedate] [weight]` where a dash
/// stands for a missing due date. It returns either an instance if everything
/// went on well or an error describing the problem.
pub fn read_instance<P: AsRef<Path>>(fname: P) -> Result<SchedulingInstance, Error> {
    let f = File::open(fname)?;
    let f = BufReader::new(f);

    let mut ptime = vec![];
    let mut duedate = vec![];
    let mut weight = vec![];

    for line in f.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut data = line.split_ascii_whitespace();

        let _id: usize = data.next().ok_or(Error::Format)?.parse()?;
        ptime.push(data.next().ok_or(Error::Format)?.parse()?);
        duedate.push(match data.next() {
            None | Some("-") => None,
            Some(text) => Some(text.parse()?),
        });
        weight.push(match data.next() {
            None => 1,
            Some(text) => text.parse()?,
        });
    }

    Ok(SchedulingInstance { nb_jobs: ptime.len(), ptime, duedate, weight })
}
