#[derive(Debug)]
pub enum Error {
    SelfLoop(/* node: */ String),
    OutOfBounds(/* order: */ usize, /* vertex: */ usize),
    MalformedLine(/* line_number: */ usize, /* line: */ String),
    MinimumSizeTooSmall(/* requested: */ u32),
    TooManyCliques(/* clique_count: */ usize),
    NoCliques(/* minimum_size: */ u32),
    Io(std::io::Error),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::SelfLoop(node) => format!(
                "error inserting edge {{{}, {}}}: self-loops are not allowed",
                node, node
            ),
            Self::OutOfBounds(order, vertex) => format!(
                "index out of bounds: the order is {} but the index is {}",
                order, vertex
            ),
            Self::MalformedLine(line_number, line) => format!(
                "malformed edge list at line {}: expected two whitespace-separated node ids, received: '{}'",
                line_number, line
            ),
            Self::MinimumSizeTooSmall(requested) => format!(
                "the minimum clique size must be at least 3, received: {}",
                requested
            ),
            Self::TooManyCliques(clique_count) => format!(
                "too many cliques for 32-bit tree indexing: {}",
                clique_count
            ),
            Self::NoCliques(minimum_size) => format!(
                "no cliques of at least size {} were found",
                minimum_size
            ),
            Self::Io(error) => format!("io error: {}", error),
        };

        write!(f, "{}", message)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
