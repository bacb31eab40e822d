//! Fundamental type kinds.
//!
//! The table mirrors libclang's `CXTypeKind` numbering so adapters backed by
//! libclang can hand over raw codes unchanged. Every leaf kind the type
//! resolver can meet is listed here; composite kinds (pointers, records,
//! typedefs, ...) are handled by [`crate::source::TypeKind`].

macro_rules! basic_types {
    ($($variant:ident = $code:literal => $name:literal, $spelling:literal, $keyword:literal;)*) => {
        /// Leaf type kinds with no further structure
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum BasicType {
            $($variant,)*
        }

        impl BasicType {
            /// Every basic kind, in code order
            pub const ALL: &'static [BasicType] = &[$(BasicType::$variant,)*];

            /// libclang numeric code
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            /// libclang kind spelling (e.g. "Char_S")
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Source-level spelling used when rendering types
            #[must_use]
            pub const fn spelling(self) -> &'static str {
                match self {
                    $(Self::$variant => $spelling,)*
                }
            }

            /// Whether the type is spelled with built-in keywords
            #[must_use]
            pub const fn is_keyword(self) -> bool {
                match self {
                    $(Self::$variant => $keyword,)*
                }
            }

            #[must_use]
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

basic_types! {
    Void = 2 => "Void", "void", true;
    Bool = 3 => "Bool", "bool", true;
    CharU = 4 => "Char_U", "char", true;
    UChar = 5 => "UChar", "unsigned char", true;
    Char16 = 6 => "Char16", "char16_t", true;
    Char32 = 7 => "Char32", "char32_t", true;
    UShort = 8 => "UShort", "unsigned short", true;
    UInt = 9 => "UInt", "unsigned int", true;
    ULong = 10 => "ULong", "unsigned long", true;
    ULongLong = 11 => "ULongLong", "unsigned long long", true;
    UInt128 = 12 => "UInt128", "unsigned __int128", false;
    CharS = 13 => "Char_S", "char", true;
    SChar = 14 => "SChar", "signed char", true;
    WChar = 15 => "WChar", "wchar_t", true;
    Short = 16 => "Short", "short", true;
    Int = 17 => "Int", "int", true;
    Long = 18 => "Long", "long", true;
    LongLong = 19 => "LongLong", "long long", true;
    Int128 = 20 => "Int128", "__int128", false;
    Float = 21 => "Float", "float", true;
    Double = 22 => "Double", "double", true;
    LongDouble = 23 => "LongDouble", "long double", true;
    NullPtr = 24 => "NullPtr", "std::nullptr_t", false;
    Overload = 25 => "Overload", "Overload", false;
    Dependent = 26 => "Dependent", "Dependent", false;
    ObjCId = 27 => "ObjCId", "id", false;
    ObjCClass = 28 => "ObjCClass", "Class", false;
    ObjCSel = 29 => "ObjCSel", "SEL", false;
    Float128 = 30 => "Float128", "__float128", false;
    Half = 31 => "Half", "half", false;
    Float16 = 32 => "Float16", "_Float16", false;
    ShortAccum = 33 => "ShortAccum", "short _Accum", false;
    Accum = 34 => "Accum", "_Accum", false;
    LongAccum = 35 => "LongAccum", "long _Accum", false;
    UShortAccum = 36 => "UShortAccum", "unsigned short _Accum", false;
    UAccum = 37 => "UAccum", "unsigned _Accum", false;
    ULongAccum = 38 => "ULongAccum", "unsigned long _Accum", false;
    BFloat16 = 39 => "BFloat16", "__bf16", false;
    Ibm128 = 40 => "Ibm128", "__ibm128", false;
    Complex = 100 => "Complex", "Complex", false;
    BlockPointer = 102 => "BlockPointer", "BlockPointer", false;
    ObjCInterface = 108 => "ObjCInterface", "ObjCInterface", false;
    ObjCObjectPointer = 109 => "ObjCObjectPointer", "ObjCObjectPointer", false;
    FunctionNoProto = 110 => "FunctionNoProto", "FunctionNoProto", false;
    FunctionProto = 111 => "FunctionProto", "FunctionProto", false;
    ConstantArray = 112 => "ConstantArray", "ConstantArray", false;
    Vector = 113 => "Vector", "Vector", false;
    IncompleteArray = 114 => "IncompleteArray", "IncompleteArray", false;
    VariableArray = 115 => "VariableArray", "VariableArray", false;
    DependentSizedArray = 116 => "DependentSizedArray", "DependentSizedArray", false;
    MemberPointer = 117 => "MemberPointer", "MemberPointer", false;
    Auto = 118 => "Auto", "auto", true;
    Pipe = 120 => "Pipe", "pipe", false;
    OclImage1dRo = 121 => "OCLImage1dRO", "image1d_t", false;
    OclImage1dArrayRo = 122 => "OCLImage1dArrayRO", "image1d_array_t", false;
    OclImage1dBufferRo = 123 => "OCLImage1dBufferRO", "image1d_buffer_t", false;
    OclImage2dRo = 124 => "OCLImage2dRO", "image2d_t", false;
    OclImage2dArrayRo = 125 => "OCLImage2dArrayRO", "image2d_array_t", false;
    OclImage2dDepthRo = 126 => "OCLImage2dDepthRO", "image2d_depth_t", false;
    OclImage2dArrayDepthRo = 127 => "OCLImage2dArrayDepthRO", "image2d_array_depth_t", false;
    OclImage2dMsaaRo = 128 => "OCLImage2dMSAARO", "image2d_msaa_t", false;
    OclImage2dArrayMsaaRo = 129 => "OCLImage2dArrayMSAARO", "image2d_array_msaa_t", false;
    OclImage2dMsaaDepthRo = 130 => "OCLImage2dMSAADepthRO", "image2d_msaa_depth_t", false;
    OclImage2dArrayMsaaDepthRo = 131 => "OCLImage2dArrayMSAADepthRO", "image2d_array_msaa_depth_t", false;
    OclImage3dRo = 132 => "OCLImage3dRO", "image3d_t", false;
    OclImage1dWo = 133 => "OCLImage1dWO", "write_only image1d_t", false;
    OclImage1dArrayWo = 134 => "OCLImage1dArrayWO", "write_only image1d_array_t", false;
    OclImage1dBufferWo = 135 => "OCLImage1dBufferWO", "write_only image1d_buffer_t", false;
    OclImage2dWo = 136 => "OCLImage2dWO", "write_only image2d_t", false;
    OclImage2dArrayWo = 137 => "OCLImage2dArrayWO", "write_only image2d_array_t", false;
    OclImage2dDepthWo = 138 => "OCLImage2dDepthWO", "write_only image2d_depth_t", false;
    OclImage2dArrayDepthWo = 139 => "OCLImage2dArrayDepthWO", "write_only image2d_array_depth_t", false;
    OclImage2dMsaaWo = 140 => "OCLImage2dMSAAWO", "write_only image2d_msaa_t", false;
    OclImage2dArrayMsaaWo = 141 => "OCLImage2dArrayMSAAWO", "write_only image2d_array_msaa_t", false;
    OclImage2dMsaaDepthWo = 142 => "OCLImage2dMSAADepthWO", "write_only image2d_msaa_depth_t", false;
    OclImage2dArrayMsaaDepthWo = 143 => "OCLImage2dArrayMSAADepthWO", "write_only image2d_array_msaa_depth_t", false;
    OclImage3dWo = 144 => "OCLImage3dWO", "write_only image3d_t", false;
    OclImage1dRw = 145 => "OCLImage1dRW", "read_write image1d_t", false;
    OclImage1dArrayRw = 146 => "OCLImage1dArrayRW", "read_write image1d_array_t", false;
    OclImage1dBufferRw = 147 => "OCLImage1dBufferRW", "read_write image1d_buffer_t", false;
    OclImage2dRw = 148 => "OCLImage2dRW", "read_write image2d_t", false;
    OclImage2dArrayRw = 149 => "OCLImage2dArrayRW", "read_write image2d_array_t", false;
    OclImage2dDepthRw = 150 => "OCLImage2dDepthRW", "read_write image2d_depth_t", false;
    OclImage2dArrayDepthRw = 151 => "OCLImage2dArrayDepthRW", "read_write image2d_array_depth_t", false;
    OclImage2dMsaaRw = 152 => "OCLImage2dMSAARW", "read_write image2d_msaa_t", false;
    OclImage2dArrayMsaaRw = 153 => "OCLImage2dArrayMSAARW", "read_write image2d_array_msaa_t", false;
    OclImage2dMsaaDepthRw = 154 => "OCLImage2dMSAADepthRW", "read_write image2d_msaa_depth_t", false;
    OclImage2dArrayMsaaDepthRw = 155 => "OCLImage2dArrayMSAADepthRW", "read_write image2d_array_msaa_depth_t", false;
    OclImage3dRw = 156 => "OCLImage3dRW", "read_write image3d_t", false;
    OclSampler = 157 => "OCLSampler", "sampler_t", false;
    OclEvent = 158 => "OCLEvent", "event_t", false;
    OclQueue = 159 => "OCLQueue", "queue_t", false;
    OclReserveId = 160 => "OCLReserveID", "reserve_id_t", false;
    ObjCObject = 161 => "ObjCObject", "ObjCObject", false;
    ObjCTypeParam = 162 => "ObjCTypeParam", "ObjCTypeParam", false;
    Attributed = 163 => "Attributed", "Attributed", false;
    OclIntelSubgroupAvcMcePayload = 164 => "OCLIntelSubgroupAVCMcePayload", "intel_sub_group_avc_mce_payload_t", false;
    OclIntelSubgroupAvcImePayload = 165 => "OCLIntelSubgroupAVCImePayload", "intel_sub_group_avc_ime_payload_t", false;
    OclIntelSubgroupAvcRefPayload = 166 => "OCLIntelSubgroupAVCRefPayload", "intel_sub_group_avc_ref_payload_t", false;
    OclIntelSubgroupAvcSicPayload = 167 => "OCLIntelSubgroupAVCSicPayload", "intel_sub_group_avc_sic_payload_t", false;
    OclIntelSubgroupAvcMceResult = 168 => "OCLIntelSubgroupAVCMceResult", "intel_sub_group_avc_mce_result_t", false;
    OclIntelSubgroupAvcImeResult = 169 => "OCLIntelSubgroupAVCImeResult", "intel_sub_group_avc_ime_result_t", false;
    OclIntelSubgroupAvcRefResult = 170 => "OCLIntelSubgroupAVCRefResult", "intel_sub_group_avc_ref_result_t", false;
    OclIntelSubgroupAvcSicResult = 171 => "OCLIntelSubgroupAVCSicResult", "intel_sub_group_avc_sic_result_t", false;
    OclIntelSubgroupAvcImeResultSingleRefStreamout = 172 => "OCLIntelSubgroupAVCImeResultSingleRefStreamout", "intel_sub_group_avc_ime_result_single_reference_streamout_t", false;
    OclIntelSubgroupAvcImeResultDualRefStreamout = 173 => "OCLIntelSubgroupAVCImeResultDualRefStreamout", "intel_sub_group_avc_ime_result_dual_reference_streamout_t", false;
    OclIntelSubgroupAvcImeSingleRefStreamin = 174 => "OCLIntelSubgroupAVCImeSingleRefStreamin", "intel_sub_group_avc_ime_single_reference_streamin_t", false;
    OclIntelSubgroupAvcImeDualRefStreamin = 175 => "OCLIntelSubgroupAVCImeDualRefStreamin", "intel_sub_group_avc_ime_dual_reference_streamin_t", false;
    ExtVector = 176 => "ExtVector", "ExtVector", false;
    Atomic = 177 => "Atomic", "_Atomic", false;
}

impl std::fmt::Display for BasicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spelling())
    }
}
