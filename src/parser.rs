use crate::Graph;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{map_res, opt},
    multi::{many1, separated_list1},
    sequence::{delimited, preceded, terminated},
    IResult,
};
use std::path::Path;

/// Errors raised while loading an input file
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input: {0}")]
    Syntax(String),
}

/// Parse line ending (handles both \n and \r\n)
fn line_ending(input: &str) -> IResult<&str, &str> {
    alt((tag("\n"), tag("\r\n")))(input)
}

/// Parse a single unsigned integer
fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// Parse a row of space-separated integers
fn parse_row(input: &str) -> IResult<&str, Vec<usize>> {
    delimited(space0, separated_list1(space1, parse_usize), space0)(input)
}

fn length_error(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::LengthValue,
    ))
}

/// Parse an optional `L <label> ...` line with exactly n labels
fn parse_labels(input: &str, n: usize) -> IResult<&str, Option<Vec<usize>>> {
    let (rest, labels) = opt(terminated(
        preceded(preceded(space0, tag("L")), parse_row),
        opt(line_ending),
    ))(input)?;

    match labels {
        Some(labels) if labels.len() != n => Err(length_error(input)),
        labels => Ok((rest, labels)),
    }
}

/// Parse a complete adjacency matrix (n rows of n elements each)
fn parse_adjacency_matrix(input: &str, n: usize) -> IResult<&str, Vec<Vec<usize>>> {
    let mut rows = Vec::with_capacity(n);
    let mut remaining = input;

    for _ in 0..n {
        let (rest, row) = terminated(parse_row, opt(line_ending))(remaining)?;

        if row.len() != n {
            return Err(length_error(remaining));
        }

        rows.push(row);
        remaining = rest;
    }

    Ok((remaining, rows))
}

/// Parse a single graph: vertex count, optional labels, adjacency matrix
fn parse_graph(input: &str) -> IResult<&str, Graph> {
    let (input, n) = terminated(delimited(space0, parse_usize, space0), line_ending)(input)?;
    let (input, labels) = parse_labels(input, n)?;
    let (input, adj) = parse_adjacency_matrix(input, n)?;

    let graph = Graph::from_adjacency_matrix(adj);
    let graph = match labels {
        Some(labels) => graph.with_labels(labels),
        None => graph,
    };
    Ok((input, graph))
}

/// Parse host and pattern graphs, in that order
pub fn parse_two_graphs(input: &str) -> IResult<&str, (Graph, Graph)> {
    let (input, host) = parse_graph(input)?;
    // Allow optional blank lines between graphs
    let (input, _) = opt(many1(line_ending))(input)?;
    let (input, pattern) = parse_graph(input)?;

    Ok((input, (host, pattern)))
}

/// Parse input file containing host and pattern graph descriptions
pub fn parse_input_file(path: &Path) -> Result<(Graph, Graph), ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;

    match parse_two_graphs(&content) {
        Ok((_, graphs)) => Ok(graphs),
        Err(e) => Err(ParseError::Syntax(e.to_string())),
    }
}

/// Render a graph in the input format understood by [`parse_two_graphs`]
pub fn format_graph(graph: &Graph) -> String {
    let mut out = format!("{}\n", graph.num_vertices());
    if graph.labels.iter().any(|&l| l != 0) {
        let labels: Vec<String> = graph.labels.iter().map(usize::to_string).collect();
        out.push_str(&format!("L {}\n", labels.join(" ")));
    }
    for row in &graph.adj {
        let cells: Vec<String> = row.iter().map(usize::to_string).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}
