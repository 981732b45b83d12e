use aa_core::error::CoreError;
use aa_core::frame::PixelBuffer;

/// Rotate `input` by `theta` radians about its center.
///
/// Reverse mapping: for each output pixel the source position is computed
/// through the inverse rotation and sampled nearest-neighbor. Sources
/// falling outside the buffer become zero (black).
///
/// # Errors
/// `Allocation` if the output buffer cannot be allocated.
///
/// # Example
/// ```
/// use aa_core::frame::PixelBuffer;
/// use aa_render::rotate::rotate;
/// let src = PixelBuffer::from_raw(2, 2, 1, vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(rotate(&src, 0.0).unwrap(), src);
/// ```
pub fn rotate(input: &PixelBuffer, theta: f32) -> Result<PixelBuffer, CoreError> {
    let mut output = PixelBuffer::new(input.width, input.height, input.channels)?;
    rotate_into(input, theta, &mut output)?;
    Ok(output)
}

/// Same as [`rotate`], writing into a pre-allocated buffer of identical shape.
///
/// # Errors
/// `Argument` if `output` does not have the shape of `input`; `output` is
/// then left untouched.
#[allow(clippy::cast_possible_wrap)]
pub fn rotate_into(input: &PixelBuffer, theta: f32, output: &mut PixelBuffer) -> Result<(), CoreError> {
    if output.width != input.width
        || output.height != input.height
        || output.channels != input.channels
    {
        return Err(CoreError::Argument(format!(
            "rotation : buffer {}x{}x{} au lieu de {}x{}x{}",
            output.width, output.height, output.channels, input.width, input.height, input.channels
        )));
    }

    let rot = theta % std::f32::consts::TAU;
    if rot.abs() < f32::EPSILON || input.data.is_empty() {
        output.data.copy_from_slice(&input.data);
        return Ok(());
    }

    let center_x = input.width as f32 / 2.0;
    let center_y = input.height as f32 / 2.0;
    let cos_a = rot.cos();
    let sin_a = rot.sin();

    let c = usize::from(input.channels);
    let stride = input.width as usize * c;
    let width = input.width as i32;
    let height = input.height as i32;

    for (y_out, row) in output.data.chunks_exact_mut(stride).enumerate() {
        let y_f = y_out as f32 - center_y;
        for x_out in 0..input.width as usize {
            let x_f = x_out as f32 - center_x;

            // Reverse rotation
            let x_src = (x_f * cos_a - y_f * sin_a + center_x).round() as i32;
            let y_src = (x_f * sin_a + y_f * cos_a + center_y).round() as i32;

            let out = &mut row[x_out * c..(x_out + 1) * c];
            if x_src >= 0 && x_src < width && y_src >= 0 && y_src < height {
                let in_idx = y_src as usize * stride + x_src as usize * c;
                out.copy_from_slice(&input.data[in_idx..in_idx + c]);
            } else {
                out.fill(0);
            }
        }
    }
    Ok(())
}
