//! Tests for index-set resolution, register references and array copies.

use arvak_classical::{
    ArrayType, ArrayValue, BitContainer, BitRegister, ClassicalError, IndexSpec, Indexed,
    QubitRegister, ScalarType, ScalarValue, Storage, concat_positions, resolve_index_set,
};

fn int(value: i64) -> ScalarValue {
    ScalarValue::int(value, 8).unwrap()
}

fn int_array(shape: Vec<usize>) -> ArrayValue {
    let n: usize = shape.iter().product();
    let data = (0..n as i64).map(int).collect();
    ArrayValue::from_elements(ScalarType::Int(8), shape, data).unwrap()
}

// ---------------------------------------------------------------------------
// Index sets
// ---------------------------------------------------------------------------

#[test]
fn stepped_range_clamps_stop() {
    assert_eq!(
        resolve_index_set(&IndexSpec::range(0, 2, 12), 12).unwrap(),
        vec![0, 2, 4, 6, 8, 10]
    );
}

#[test]
fn negative_range_selects_tail() {
    assert_eq!(
        resolve_index_set(&IndexSpec::span(-4, -1), 10).unwrap(),
        vec![6, 7, 8, 9]
    );
}

#[test]
fn negative_single_indices() {
    assert_eq!(resolve_index_set(&IndexSpec::Single(-1), 5).unwrap(), vec![4]);
    assert_eq!(resolve_index_set(&IndexSpec::Single(-5), 5).unwrap(), vec![0]);
    assert_eq!(
        resolve_index_set(&IndexSpec::Single(-6), 5),
        Err(ClassicalError::IndexOutOfRange { index: -6, length: 5 })
    );
}

#[test]
fn discrete_set_out_of_range() {
    assert!(matches!(
        resolve_index_set(&IndexSpec::Set(vec![0, 7]), 4),
        Err(ClassicalError::IndexOutOfRange { index: 7, .. })
    ));
}

#[test]
fn zero_step_is_rejected() {
    assert_eq!(
        resolve_index_set(&IndexSpec::range(0, 0, 3), 4),
        Err(ClassicalError::ZeroStep)
    );
}

#[test]
fn extreme_steps_stop_after_first_position() {
    assert_eq!(
        resolve_index_set(&IndexSpec::range(1, i64::MAX, 5), 10).unwrap(),
        vec![1]
    );
    assert_eq!(
        resolve_index_set(&IndexSpec::range(8, i64::MIN, 0), 10).unwrap(),
        vec![8]
    );
    let open = IndexSpec::Range {
        start: None,
        step: Some(i64::MAX),
        stop: None,
    };
    assert_eq!(resolve_index_set(&open, 10).unwrap(), vec![0]);
}

#[test]
fn concatenated_positions_keep_order() {
    let a = resolve_index_set(&IndexSpec::Set(vec![3, 1]), 4).unwrap();
    let b = resolve_index_set(&IndexSpec::span(0, 1), 4).unwrap();
    assert_eq!(concat_positions(&a, &b), vec![3, 1, 0, 1]);
}

// ---------------------------------------------------------------------------
// Registers are references
// ---------------------------------------------------------------------------

#[test]
fn register_slice_mutation_reaches_source() {
    let mut storage = Storage::new();
    let two = BitRegister::from_ids(storage.alloc_bits(6).unwrap());
    let slice = two.slice(&IndexSpec::Set(vec![0, 3, 5])).unwrap();
    slice.set(&mut storage, 0, true).unwrap();
    assert!(two.get(&storage, 0).unwrap());
}

#[test]
fn register_self_concat_rejected() {
    let mut storage = Storage::new();
    let q = QubitRegister::from_ids(storage.alloc_qubits(3).unwrap());
    assert_eq!(q.concat(&q), Err(ClassicalError::SelfConcatenation));
}

#[test]
fn empty_register_selection_rejected() {
    let mut storage = Storage::new();
    let c = BitRegister::from_ids(storage.alloc_bits(4).unwrap());
    assert_eq!(
        c.read_slice(&storage, &IndexSpec::range(2, 1, 0)),
        Err(ClassicalError::EmptyIndexSet)
    );
}

// ---------------------------------------------------------------------------
// Arrays are copies
// ---------------------------------------------------------------------------

#[test]
fn array_slice_is_a_copy() {
    let source = int_array(vec![6]);
    let Indexed::Array(mut copy) = source.get(&[IndexSpec::Set(vec![0, 3, 5])]).unwrap() else {
        panic!("expected an array");
    };
    copy.assign(&[IndexSpec::Single(0)], &Indexed::Scalar(int(99)))
        .unwrap();
    assert_eq!(
        source.get(&[IndexSpec::Single(0)]).unwrap(),
        Indexed::Scalar(int(0))
    );
    assert_eq!(copy.get(&[IndexSpec::Single(0)]).unwrap(), Indexed::Scalar(int(99)));
}

#[test]
fn array_slice_as_assignment_target_writes_through() {
    let mut array = int_array(vec![6]);
    {
        let mut target = array.slice_mut(&[IndexSpec::Set(vec![0, 3, 5])]).unwrap();
        target.set(0, int(42)).unwrap();
    }
    assert_eq!(array.get(&[IndexSpec::Single(0)]).unwrap(), Indexed::Scalar(int(42)));
}

#[test]
fn shape_mismatch_leaves_array_untouched() {
    let mut array = int_array(vec![4]);
    let three = int_array(vec![3]);
    assert!(matches!(
        array.assign(&[IndexSpec::full()], &Indexed::Array(three)),
        Err(ClassicalError::ShapeMismatch { .. })
    ));
    assert_eq!(array, int_array(vec![4]));
}

#[test]
fn comma_and_chained_subscripts_differ() {
    let array = int_array(vec![2, 3]);
    // a[1, 2] selects the element at row 1, column 2.
    assert_eq!(
        array
            .get(&[IndexSpec::Single(1), IndexSpec::Single(2)])
            .unwrap(),
        Indexed::Scalar(int(5))
    );
    // a[1][2] does the same via successive brackets.
    let chained = array
        .get_chain(&[vec![IndexSpec::Single(1)], vec![IndexSpec::Single(2)]])
        .unwrap();
    assert_eq!(chained, Indexed::Scalar(int(5)));
    // A third bracket drops into the element's bits: 5 = 0b00000101.
    let bit = array
        .get_chain(&[
            vec![IndexSpec::Single(1)],
            vec![IndexSpec::Single(2)],
            vec![IndexSpec::Single(2)],
        ])
        .unwrap();
    assert_eq!(bit, Indexed::Bits(BitContainer::from_bits(vec![true])));
}

#[test]
fn trailing_dimensions_taken_whole() {
    let array = int_array(vec![2, 3]);
    let Indexed::Array(row) = array.get(&[IndexSpec::Single(-1)]).unwrap() else {
        panic!("expected a row");
    };
    assert_eq!(row.shape(), &[3]);
    assert_eq!(row.elements(), &[int(3), int(4), int(5)]);
}

#[test]
fn array_self_concat_copies() {
    let first = int_array(vec![2]);
    let doubled = first.concat(&first).unwrap();
    assert_eq!(doubled.shape(), &[4]);
    assert_eq!(doubled.elements()[2], int(0));
}

#[test]
fn too_many_dimensions() {
    assert_eq!(
        ArrayType::new(ScalarType::Bool, vec![1; 8]),
        Err(ClassicalError::TooManyDimensions(8))
    );
}
