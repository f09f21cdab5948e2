use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef};
use zsl_circuit::{
    note::{self, hash_to_bits, merkle_node, EMPTY_LEAF},
    shielding::OutputNote,
    unshielding::SpendWitness,
    CircuitKind, PublicInputs, ShieldingCircuit, TransferCircuit, TransferWitness,
    UnshieldingCircuit, ZslCircuit,
};

const DEPTH: usize = 2;

fn synthesize<C: ZslCircuit>(circuit: C) -> ConstraintSystemRef<Fr> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).unwrap();
    cs
}

fn satisfied<C: ZslCircuit>(circuit: C) -> bool {
    synthesize(circuit).is_satisfied().unwrap()
}

fn owned_note(seed: u8, value: u64) -> (OutputNote, [u8; 32]) {
    let sk = [seed; 32];
    let note = OutputNote {
        rho: [seed.wrapping_add(100); 32],
        pk: note::derive_pk(&sk),
        value,
    };
    (note, sk)
}

/// Two notes in a depth-2 tree at positions 0 and 1.
struct TwoLeafTree {
    notes: [(OutputNote, [u8; 32]); 2],
}

impl TwoLeafTree {
    fn new(values: [u64; 2]) -> Self {
        Self {
            notes: [owned_note(1, values[0]), owned_note(2, values[1])],
        }
    }

    fn root(&self) -> [u8; 32] {
        let left = merkle_node(&self.notes[0].0.commitment(), &self.notes[1].0.commitment());
        merkle_node(&left, &merkle_node(&EMPTY_LEAF, &EMPTY_LEAF))
    }

    fn spend(&self, index: usize) -> SpendWitness {
        let (note, sk) = &self.notes[index];
        let sibling = self.notes[1 - index].0.commitment();
        SpendWitness {
            rho: note.rho,
            sk: *sk,
            value: note.value,
            tree_position: index as u64,
            auth_path: vec![
                hash_to_bits(&merkle_node(&EMPTY_LEAF, &EMPTY_LEAF)),
                hash_to_bits(&sibling),
            ],
        }
    }
}

fn transfer_witness(tree: &TwoLeafTree, outputs: [u64; 2]) -> TransferWitness {
    TransferWitness {
        inputs: [tree.spend(0), tree.spend(1)],
        outputs: [owned_note(7, outputs[0]).0, owned_note(8, outputs[1]).0],
    }
}

#[test]
fn shielding_scenario_is_satisfied() {
    let note = OutputNote {
        rho: [0x01; 32],
        pk: [0x02; 32],
        value: 100,
    };
    let circuit = ShieldingCircuit::new(note.clone(), DEPTH).unwrap();
    assert_eq!(circuit.public_inputs().commitment, note.commitment());
    assert_eq!(circuit.public_inputs().send_nullifier, note::send_nullifier(&[0x01; 32]));
    assert!(satisfied(circuit));
}

#[test]
fn shielding_value_mismatch_fails() {
    let note = OutputNote {
        rho: [0x01; 32],
        pk: [0x02; 32],
        value: 100,
    };
    let circuit = ShieldingCircuit::new(note, DEPTH).unwrap();
    let mut public = circuit.public_inputs().clone();
    public.value = 101;
    assert!(!satisfied(circuit.with_public_inputs(public)));
}

#[test]
fn shielding_wrong_send_nullifier_fails() {
    let circuit = ShieldingCircuit::new(owned_note(3, 50).0, DEPTH).unwrap();
    let mut public = circuit.public_inputs().clone();
    public.send_nullifier[31] ^= 0x01;
    assert!(!satisfied(circuit.with_public_inputs(public)));
}

#[test]
fn unshielding_zero_path_is_satisfied() {
    let (note, sk) = owned_note(5, 42);
    let spend = SpendWitness {
        rho: note.rho,
        sk,
        value: 42,
        tree_position: 0,
        auth_path: vec![hash_to_bits(&EMPTY_LEAF); DEPTH],
    };
    let circuit = UnshieldingCircuit::new(spend, DEPTH).unwrap();
    let expected_root = merkle_node(&merkle_node(&note.commitment(), &EMPTY_LEAF), &EMPTY_LEAF);
    assert_eq!(circuit.public_inputs().anchor, expected_root);
    assert!(satisfied(circuit));
}

#[test]
fn unshielding_member_of_two_leaf_tree() {
    let tree = TwoLeafTree::new([10, 20]);
    for index in 0..2 {
        let circuit = UnshieldingCircuit::new(tree.spend(index), DEPTH).unwrap();
        assert_eq!(circuit.public_inputs().anchor, tree.root());
        assert!(satisfied(circuit));
    }
}

#[test]
fn unshielding_wrong_anchor_fails() {
    let tree = TwoLeafTree::new([10, 20]);
    let circuit = UnshieldingCircuit::new(tree.spend(1), DEPTH).unwrap();
    let mut public = circuit.public_inputs().clone();
    public.anchor[0] ^= 0x80;
    assert!(!satisfied(circuit.with_public_inputs(public)));
}

#[test]
fn unshielding_wrong_value_fails() {
    let tree = TwoLeafTree::new([10, 20]);
    let circuit = UnshieldingCircuit::new(tree.spend(0), DEPTH).unwrap();
    let mut public = circuit.public_inputs().clone();
    public.value += 1;
    assert!(!satisfied(circuit.with_public_inputs(public)));
}

#[test]
fn unshielding_rejects_malformed_paths() {
    let tree = TwoLeafTree::new([10, 20]);
    let mut spend = tree.spend(0);
    spend.tree_position = 4;
    assert!(UnshieldingCircuit::new(spend, DEPTH).is_err());
    assert!(UnshieldingCircuit::new(tree.spend(0), DEPTH + 1).is_err());
}

#[test]
fn balanced_transfer_is_satisfied() {
    let tree = TwoLeafTree::new([10, 20]);
    let circuit = TransferCircuit::new(transfer_witness(&tree, [25, 5]), DEPTH).unwrap();
    assert_eq!(circuit.public_inputs().anchor, tree.root());
    assert!(satisfied(circuit));
}

#[test]
fn unbalanced_transfer_fails() {
    let tree = TwoLeafTree::new([10, 20]);
    let circuit = TransferCircuit::new(transfer_witness(&tree, [25, 6]), DEPTH).unwrap();
    assert!(!satisfied(circuit));
}

#[test]
fn transfer_with_dummy_input_skips_membership() {
    let tree = TwoLeafTree::new([30, 0]);
    let mut witness = transfer_witness(&tree, [30, 0]);
    // The dummy's path is garbage; only its value-zero status matters.
    witness.inputs[1].auth_path = vec![hash_to_bits(&[0xee; 32]); DEPTH];
    let circuit = TransferCircuit::new(witness, DEPTH).unwrap();
    assert_eq!(circuit.public_inputs().anchor, tree.root());
    assert!(satisfied(circuit));
}

#[test]
fn transfer_nonzero_input_outside_tree_fails() {
    let tree = TwoLeafTree::new([10, 20]);
    let mut witness = transfer_witness(&tree, [25, 5]);
    witness.inputs[1].auth_path = vec![hash_to_bits(&[0xee; 32]); DEPTH];
    assert!(!satisfied(TransferCircuit::new(witness, DEPTH).unwrap()));
}

#[test]
fn transfer_double_spend_fails() {
    let tree = TwoLeafTree::new([10, 20]);
    let mut witness = transfer_witness(&tree, [20, 0]);
    witness.inputs[1] = witness.inputs[0].clone();
    assert!(!satisfied(TransferCircuit::new(witness, DEPTH).unwrap()));
}

#[test]
fn transfer_wrong_commitment_fails() {
    let tree = TwoLeafTree::new([10, 20]);
    let circuit = TransferCircuit::new(transfer_witness(&tree, [25, 5]), DEPTH).unwrap();
    let mut public = circuit.public_inputs().clone();
    public.commitments[1][7] ^= 0x04;
    assert!(!satisfied(circuit.with_public_inputs(public)));
}

#[test]
fn blank_circuits_have_the_shape_of_real_ones() {
    let tree = TwoLeafTree::new([10, 20]);

    let real = synthesize(ShieldingCircuit::new(owned_note(1, 9).0, DEPTH).unwrap());
    let blank = synthesize(ShieldingCircuit::blank(DEPTH));
    assert_eq!(real.num_constraints(), blank.num_constraints());

    let real = synthesize(UnshieldingCircuit::new(tree.spend(0), DEPTH).unwrap());
    let blank = synthesize(UnshieldingCircuit::blank(DEPTH));
    assert_eq!(real.num_constraints(), blank.num_constraints());

    let real = synthesize(TransferCircuit::new(transfer_witness(&tree, [25, 5]), DEPTH).unwrap());
    let blank = synthesize(TransferCircuit::blank(DEPTH));
    assert_eq!(real.num_constraints(), blank.num_constraints());
}

#[test]
fn instance_vectors_match_allocated_inputs() {
    let tree = TwoLeafTree::new([10, 20]);

    let circuit = UnshieldingCircuit::new(tree.spend(0), DEPTH).unwrap();
    let elements = circuit.public_inputs().to_field_elements();
    let cs = synthesize(circuit);
    assert_eq!(elements.len(), CircuitKind::Unshielding.public_input_count());
    // slot 0 is the constant one
    assert_eq!(cs.num_instance_variables(), elements.len() + 1);
    assert_eq!(cs.borrow().unwrap().instance_assignment[1..], elements[..]);

    let circuit = TransferCircuit::new(transfer_witness(&tree, [25, 5]), DEPTH).unwrap();
    let elements = circuit.public_inputs().to_field_elements();
    let cs = synthesize(circuit);
    assert_eq!(elements.len(), CircuitKind::Transfer.public_input_count());
    assert_eq!(cs.num_instance_variables(), elements.len() + 1);
}
