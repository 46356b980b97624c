use crate::cliques::Clique;
use crate::components::Components;
use crate::error::Error;
use crate::loading::NodeNameIndex;
use foldhash::{HashSet, HashSetExt};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

// an already existing directory is fine, anything else is fatal
pub fn create_output_directory(directory: &Path) -> Result<(), Error> {
    match fs::create_dir(directory) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(error) => Err(Error::Io(error)),
    }
}

// writes <directory>/commK, one community per line: the union of the member
// cliques' vertices, printed as external node names
pub fn write_level(
    directory: &Path,
    k: u32,
    components: &Components,
    found_communities: &[u32],
    cliques: &[Clique],
    names: &NodeNameIndex,
) -> Result<(), Error> {
    let path = directory.join(format!("comm{}", k));
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut community_nodes: HashSet<u32> = HashSet::new();
    for &community in found_communities {
        community_nodes.clear();
        for clique_id in components.members(community) {
            community_nodes.extend(&cliques[clique_id as usize]);
        }

        let mut first_on_line = true;
        for &node in &community_nodes {
            if !first_on_line {
                write!(writer, " ")?;
            }
            write!(writer, "{}", names.name(node))?;
            first_on_line = false;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
