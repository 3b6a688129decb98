use super::commands::{command, Action, Candidate, CommandCode, Slot};

/// A complete match of the selection against a command signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub action: Action,
    /// Selection indices in dependency order.
    pub order: Vec<usize>,
}

/// Whether `candidate` may join `selection` for `code`: some signature of
/// the command still fits once it is added.
pub fn is_available<C>(code: CommandCode, candidate: C, selection: &[C]) -> bool
where
    C: Copy + Into<Candidate>,
{
    let Some(spec) = command(code) else {
        return false;
    };
    let mut kinds: Vec<Candidate> = selection.iter().map(|&c| c.into()).collect();
    kinds.push(candidate.into());
    spec.signatures
        .iter()
        .any(|sig| assign(sig.slots, &kinds).is_some())
}

/// Whether `selection` completely fills one of the command's signatures.
pub fn is_ready<C>(code: CommandCode, selection: &[C]) -> bool
where
    C: Copy + Into<Candidate>,
{
    resolve(code, selection).is_some()
}

/// The first signature `selection` completely fills, with the selection
/// reordered into dependency order.
pub fn resolve<C>(code: CommandCode, selection: &[C]) -> Option<Resolved>
where
    C: Copy + Into<Candidate>,
{
    let spec = command(code)?;
    let selection: Vec<Candidate> = selection.iter().map(|&c| c.into()).collect();
    spec.signatures
        .iter()
        .filter(|sig| sig.slots.len() == selection.len())
        .find_map(|sig| {
            assign(sig.slots, &selection).map(|slots| Resolved {
                action: sig.action,
                order: slots.into_iter().flatten().collect(),
            })
        })
}

/// Places each selected kind, in selection order, into the first free slot
/// that accepts it, backtracking when a later kind finds no slot. Returns,
/// per slot, the selection index assigned to it.
fn assign(slots: &[Slot], kinds: &[Candidate]) -> Option<Vec<Option<usize>>> {
    if kinds.len() > slots.len() {
        return None;
    }
    let mut filled = vec![None; slots.len()];
    if place(0, slots, kinds, &mut filled) {
        Some(filled)
    } else {
        None
    }
}

fn place(i: usize, slots: &[Slot], kinds: &[Candidate], filled: &mut [Option<usize>]) -> bool {
    if i == kinds.len() {
        return true;
    }
    for j in 0..slots.len() {
        if filled[j].is_some() || !slots[j].accepts(kinds[i]) {
            continue;
        }
        filled[j] = Some(i);
        if place(i + 1, slots, kinds, filled) {
            return true;
        }
        filled[j] = None;
    }
    false
}
