mod cases;

use cases::*;
use quill::Value;

test_case!(
    single_integer,
    program: program([int(1)]),
    disassembly: "0000 OpConstant 0\n",
    result: Ok(Some(Value::Integer(1))),
);

test_case!(
    simple_addition,
    program: program([add(int(1), int(2))]),
    disassembly: "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpAdd\n",
    result: Ok(Some(Value::Integer(3))),
);

test_case!(
    subtraction_order,
    program: program([sub(int(5), int(2))]),
    disassembly: "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpSub\n",
    result: Ok(Some(Value::Integer(3))),
);

test_case!(
    division_order,
    program: program([div(int(8), int(2))]),
    disassembly: "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpDiv\n",
    result: Ok(Some(Value::Integer(4))),
);

test_case!(
    division_truncates_toward_zero,
    program: program([div(int(-7), int(2))]),
    result: Ok(Some(Value::Integer(-3))),
);

test_case!(
    multiplication,
    program: program([mul(int(6), int(7))]),
    disassembly: "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpMul\n",
    result: Ok(Some(Value::Integer(42))),
);

test_case!(
    left_associative_chain,
    // (10 - 3) - 2
    program: program([sub(sub(int(10), int(3)), int(2))]),
    disassembly: "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpSub\n0007 OpConstant 2\n0010 OpSub\n",
    result: Ok(Some(Value::Integer(5))),
);

test_case!(
    right_nested,
    // 2 * (3 + 4)
    program: program([mul(int(2), add(int(3), int(4)))]),
    disassembly: "0000 OpConstant 0\n0003 OpConstant 1\n0006 OpConstant 2\n0009 OpAdd\n0010 OpMul\n",
    result: Ok(Some(Value::Integer(14))),
);

test_case!(
    negative_literals,
    program: program([add(int(-5), int(3))]),
    result: Ok(Some(Value::Integer(-2))),
);

test_case!(
    boolean_literal,
    program: program([boolean(false)]),
    result: Ok(Some(Value::Boolean(false))),
);

test_case!(
    results_accumulate_without_pops,
    // Both results stay on the stack; the last one is on top.
    program: program([int(1), add(int(2), int(3))]),
    result: Ok(Some(Value::Integer(5))),
);

test_case!(
    empty_program,
    program: program([]),
    disassembly: "",
    result: Ok(None),
);

#[test]
fn popped_results() {
    let engine = &*POPPING_ENGINE;
    let bytecode = engine
        .compile(&program([int(1), add(int(2), int(3))]))
        .unwrap();
    pretty_assertions::assert_eq!(
        bytecode.instructions.to_string(),
        "0000 OpConstant 0\n0003 OpPop\n0004 OpConstant 1\n0007 OpConstant 2\n0010 OpAdd\n0011 OpPop\n"
    );
    assert_eq!(engine.execute(&bytecode).unwrap(), Some(Value::Integer(5)));
}

#[test]
fn artifact_is_reusable() {
    let engine = &*ENGINE;
    let bytecode = engine.compile(&program([mul(int(3), int(3))])).unwrap();
    for _ in 0..3 {
        assert_eq!(engine.execute(&bytecode).unwrap(), Some(Value::Integer(9)));
    }
}
