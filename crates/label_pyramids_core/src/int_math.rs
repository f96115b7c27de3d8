use num::Integer;

/// Integer division rounding toward negative infinity.
#[inline]
pub fn div_floor(x: i32, divisor: i32) -> i32 {
    Integer::div_floor(&x, &divisor)
}

/// Integer division rounding toward positive infinity.
#[inline]
pub fn div_ceil(x: i32, divisor: i32) -> i32 {
    let (quotient, remainder) = Integer::div_mod_floor(&x, &divisor);

    if remainder == 0 {
        quotient
    } else {
        quotient + 1
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
